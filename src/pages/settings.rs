use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, BackendConfigView};

const PREF_BACKEND_URL: &str = "backend_url";
const PREF_TIMEOUT_SECS: &str = "request_timeout_secs";
const PREF_UPLOAD_ENCODING: &str = "upload_encoding";

/// Reject values the backend would refuse before anything is written.
fn check_settings(url: &str, timeout: &str) -> Result<(), String> {
    let url = url.trim().to_lowercase();
    if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err("Backend URL must start with http:// or https://".to_string());
    }
    let timeout = timeout.trim();
    if !timeout.is_empty() && !matches!(timeout.parse::<u64>(), Ok(secs) if secs > 0) {
        return Err("Request timeout must be a positive number of seconds".to_string());
    }
    Ok(())
}

/// Name the field that failed and the ones already stored.
fn save_failure_message(saved: &[&str], failed: &str, error: &str) -> String {
    if saved.is_empty() {
        format!("Failed to save {}: {}", failed, error)
    } else {
        format!("Saved {}, but failed to save {}: {}", saved.join(", "), failed, error)
    }
}

fn source_label(source: &str) -> &'static str {
    match source {
        "preference" => "saved setting",
        "environment" => "environment variable",
        _ => "built-in default",
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let (backend_url, set_backend_url) = signal(String::new());
    let (timeout_secs, set_timeout_secs) = signal(String::new());
    let (encoding, set_encoding) = signal(String::from("auto"));
    let (effective, set_effective) = signal::<Option<BackendConfigView>>(None);
    let (status, set_status) = signal::<Option<String>>(None);

    let refresh_effective = move || {
        spawn_local(async move {
            match commands::get_backend_config().await {
                Ok(view) => set_effective.set(Some(view)),
                Err(e) => set_status.set(Some(format!("Current configuration is invalid: {}", e))),
            }
        });
    };

    // Load saved preferences on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let loaded = async {
                let url = commands::get_preference(PREF_BACKEND_URL).await?;
                let timeout = commands::get_preference(PREF_TIMEOUT_SECS).await?;
                let enc = commands::get_preference(PREF_UPLOAD_ENCODING).await?;
                Ok::<_, String>((url, timeout, enc))
            }
            .await;

            match loaded {
                Ok((url, timeout, enc)) => {
                    set_backend_url.set(url.unwrap_or_default());
                    set_timeout_secs.set(timeout.unwrap_or_default());
                    if let Some(enc) = enc {
                        set_encoding.set(enc);
                    }
                }
                Err(e) => set_status.set(Some(format!("Failed to load preferences: {}", e))),
            }
        });
        refresh_effective();
    });

    let save = move |_| {
        let url = backend_url.get();
        let timeout = timeout_secs.get();
        let enc = encoding.get();
        if let Err(e) = check_settings(&url, &timeout) {
            set_status.set(Some(format!("Not saved: {}", e)));
            return;
        }
        spawn_local(async move {
            let fields = [
                (PREF_BACKEND_URL, "backend URL", url),
                (PREF_TIMEOUT_SECS, "request timeout", timeout),
                (PREF_UPLOAD_ENCODING, "upload format", enc),
            ];
            let mut saved = Vec::new();
            let mut failure = None;
            for (key, label, value) in fields {
                match commands::set_preference(key, &value).await {
                    Ok(()) => saved.push(label),
                    Err(e) => {
                        failure = Some(save_failure_message(&saved, label, &e));
                        break;
                    }
                }
            }

            set_status.set(Some(failure.unwrap_or_else(|| "Settings saved".to_string())));
            refresh_effective();
        });
    };

    view! {
        <div class="page settings-page">
            <h2>"Settings"</h2>

            <section class="settings-section">
                <h3>"Analysis Backend"</h3>
                <p class="section-description">
                    "Leave a field empty to fall back to the environment or the built-in default."
                </p>

                <div class="form-group">
                    <label for="backend-url">"Backend URL"</label>
                    <input
                        id="backend-url"
                        type="url"
                        placeholder="http://192.168.1.20:8000"
                        class="input"
                        prop:value=move || backend_url.get()
                        on:input=move |ev| set_backend_url.set(event_target_value(&ev))
                    />
                </div>

                <div class="form-group">
                    <label for="timeout-secs">"Request timeout (seconds)"</label>
                    <input
                        id="timeout-secs"
                        type="number"
                        min="1"
                        placeholder="120"
                        class="input"
                        prop:value=move || timeout_secs.get()
                        on:input=move |ev| set_timeout_secs.set(event_target_value(&ev))
                    />
                </div>

                <div class="form-group">
                    <label for="upload-encoding">"Upload format"</label>
                    <select
                        id="upload-encoding"
                        class="input"
                        prop:value=move || encoding.get()
                        on:change=move |ev| set_encoding.set(event_target_value(&ev))
                    >
                        <option value="auto">"Convert to JPEG when needed"</option>
                        <option value="jpeg">"Always re-encode as JPEG"</option>
                        <option value="original">"Send original file"</option>
                    </select>
                </div>

                <button class="btn btn-save" on:click=save>"Save"</button>
                <Show when=move || status.get().is_some()>
                    <span class="status-text">{move || status.get().unwrap_or_default()}</span>
                </Show>
            </section>

            {move || effective.get().map(|cfg| view! {
                <section class="settings-section">
                    <h3>"In Use"</h3>
                    <p class="section-description">
                        {format!("{} (from {})", cfg.base_url, source_label(&cfg.base_url_source))}
                    </p>
                    <p class="section-description">
                        {format!("Timeout {} s, upload format {}", cfg.timeout_secs, cfg.upload_encoding)}
                    </p>
                </section>
            })}
        </div>
    }
}
