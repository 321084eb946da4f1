use leptos::prelude::*;

use crate::browser;

/// One labelled value with a color dot. Fades in after `delay_ms`; pressing
/// it hands `(value, label)` to `on_copy`.
#[component]
pub fn ColorValueItem(
    #[prop(into)] label: String,
    #[prop(into)] value: String,
    /// CSS color of the dot
    #[prop(into)]
    color: String,
    #[prop(default = 0)] delay_ms: u32,
    #[prop(default = None)] on_copy: Option<Callback<(String, String)>>,
) -> impl IntoView {
    let (entered, set_entered) = signal(false);
    let (pressed, set_pressed) = signal(false);

    let timer = browser::set_timeout(delay_ms as i32, move || set_entered.set(true));
    on_cleanup(move || {
        if let Some(id) = timer {
            browser::clear_timeout(id);
        }
    });

    let copyable = on_copy.is_some();
    let aria = format!("{}: {}. Tap to copy", label, value);
    let value_for_copy = value.clone();
    let label_for_copy = label.clone();

    let on_click = move |_| {
        if let Some(cb) = on_copy {
            cb.run((value_for_copy.clone(), label_for_copy.clone()));
        }
    };

    view! {
        <div
            class="color-value-item"
            class:entered=move || entered.get()
            class:pressed=move || pressed.get()
            role="button"
            aria-label=aria
            on:pointerdown=move |_| set_pressed.set(true)
            on:pointerup=move |_| set_pressed.set(false)
            on:pointerleave=move |_| set_pressed.set(false)
            on:click=on_click
        >
            <span class="color-dot" style=format!("background-color: {}", color)></span>
            <span class="value-label">{format!("{}:", label)}</span>
            <span class="value-text">{value}</span>
            <Show when=move || copyable>
                <span class="copy-hint">"Tap to copy"</span>
            </Show>
        </div>
    }
}
