use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, BackendHealth};
use crate::components::status_badge::{CheckStatus, StatusBadge};

#[component]
pub fn HealthPage() -> impl IntoView {
    let (checking, set_checking) = signal(false);
    let (report, set_report) = signal::<Option<BackendHealth>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    let do_health_check = move || {
        set_checking.set(true);
        set_error.set(None);
        spawn_local(async move {
            match commands::check_backend_health().await {
                Ok(r) => {
                    set_report.set(Some(r));
                }
                Err(e) => {
                    set_error.set(Some(format!("Health check failed: {}", e)));
                }
            }
            set_checking.set(false);
        });
    };

    // Auto-run health check on mount
    Effect::new(move |_| {
        do_health_check();
    });

    view! {
        <div class="page health-page">
            <h2>"Backend Health"</h2>
            <p class="page-description">
                "Check that the analysis server is running and reachable from this device."
            </p>

            <button
                class="btn btn-primary"
                on:click=move |_| do_health_check()
                disabled=move || checking.get()
            >
                {move || if checking.get() { "Checking..." } else { "Check Again" }}
            </button>

            {move || {
                error.get().map(|e| {
                    view! {
                        <div class="health-error">
                            <span class="status-text status-error">{e}</span>
                        </div>
                    }
                })
            }}

            {move || {
                report.get().map(|r| {
                    let reachable_detail = match (&r.error, r.http_status) {
                        (Some(e), _) => e.clone(),
                        (None, Some(code)) => format!("HTTP {}", code),
                        (None, None) => String::new(),
                    };
                    let status_check = match r.status.as_deref() {
                        Some("ok") => CheckStatus::Pass,
                        Some(_) => CheckStatus::Fail,
                        None => CheckStatus::Unknown,
                    };
                    let status_detail = r.status.clone().unwrap_or_else(|| "Not reported".to_string());
                    let latency = r
                        .latency_ms
                        .map(|ms| format!("{} ms", ms))
                        .unwrap_or_else(|| "-".to_string());

                    let summary_class = if r.reachable && status_check == CheckStatus::Pass {
                        "summary-all-pass"
                    } else if r.reachable {
                        "summary-partial"
                    } else {
                        "summary-all-fail"
                    };
                    let summary = if r.reachable {
                        "Backend is reachable"
                    } else {
                        "Backend is not reachable. Check the URL in Settings and that the server is running."
                    };

                    view! {
                        <div class="health-results">
                            <StatusBadge label="Server URL" status=CheckStatus::Unknown detail=r.url.clone() />
                            <StatusBadge
                                label="Reachable"
                                status=CheckStatus::from_bool(r.reachable)
                                detail=reachable_detail
                            />
                            <StatusBadge label="Reported Status" status=status_check detail=status_detail />
                            <StatusBadge label="Latency" status=CheckStatus::from_bool(r.latency_ms.is_some()) detail=latency />

                            <div class={format!("health-summary {}", summary_class)}>{summary}</div>
                        </div>
                    }
                })
            }}
        </div>
    }
}
