use leptos::prelude::*;

use crate::browser;
use crate::components::color_value_item::ColorValueItem;

/// Delay between consecutive rows of a card.
pub const ITEM_STAGGER_MS: u32 = 50;

/// Entrance delay of the item at `index` in a card shown after `card_delay_ms`.
pub fn item_delay(card_delay_ms: u32, index: usize) -> u32 {
    card_delay_ms + index as u32 * ITEM_STAGGER_MS
}

/// Titled card of [`ColorValueItem`] rows with a staged entrance.
#[component]
pub fn ColorValueCard(
    #[prop(into)] title: String,
    /// `(label, value)` pairs in display order
    values: Vec<(String, String)>,
    #[prop(into)] color: String,
    #[prop(default = 0)] delay_ms: u32,
    #[prop(default = None)] on_copy: Option<Callback<(String, String)>>,
) -> impl IntoView {
    let (entered, set_entered) = signal(false);

    let timer = browser::set_timeout(delay_ms as i32, move || set_entered.set(true));
    on_cleanup(move || {
        if let Some(id) = timer {
            browser::clear_timeout(id);
        }
    });

    let items = values
        .into_iter()
        .enumerate()
        .map(|(index, (label, value))| {
            view! {
                <ColorValueItem
                    label=label
                    value=value
                    color=color.clone()
                    delay_ms=item_delay(delay_ms, index)
                    on_copy=on_copy
                />
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="color-value-card" class:entered=move || entered.get()>
            <style>{include_str!("color_value_card.css")}</style>
            <h3 class="card-title">{title}</h3>
            <div class="values-container">{items}</div>
        </div>
    }
}
