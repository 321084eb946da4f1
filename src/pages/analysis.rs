//! Analysis page: pick or capture a test strip photo, send it to the
//! backend and show the report.
//!
//! All transitions go through [`AnalysisFlow`]; this module only runs the
//! effects it asks for.

use leptos::html::Input;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::browser;
use crate::commands::{self, AnalysisReport};
use crate::components::report_view::ReportView;
use crate::flow::{AnalysisFlow, Effect, FlowEvent, FlowState, ImageSource};

const TOAST_MS: i32 = 2000;

type Flow = AnalysisFlow<AnalysisReport>;

/// Clear the pending toast timer and store the one `start` returns.
///
/// Does nothing once the page has been torn down and `slot` is disposed.
fn replace_toast_timer(
    slot: StoredValue<Option<i32>>,
    clear: impl FnOnce(i32),
    start: impl FnOnce() -> Option<i32>,
) {
    let Some(previous) = slot.try_get_value() else {
        return;
    };
    if let Some(id) = previous {
        clear(id);
    }
    slot.try_set_value(start());
}

/// Reactive handles the effect runner needs.
#[derive(Clone, Copy)]
struct FlowHandles {
    flow: RwSignal<Flow>,
    gallery_input: NodeRef<Input>,
    camera_input: NodeRef<Input>,
}

fn dispatch(handles: FlowHandles, event: FlowEvent<AnalysisReport>) {
    let effects = handles
        .flow
        .try_update(|flow| flow.handle(event))
        .unwrap_or_default();
    for effect in effects {
        run_effect(handles, effect);
    }
}

fn run_effect(handles: FlowHandles, effect: Effect) {
    match effect {
        Effect::RequestPermission(source) => spawn_local(async move {
            let granted = browser::request_permission(source).await;
            dispatch(handles, FlowEvent::PermissionResolved { granted });
        }),

        Effect::OpenPicker(source) => {
            let input = match source {
                ImageSource::Gallery => handles.gallery_input.get_untracked(),
                ImageSource::Camera => handles.camera_input.get_untracked(),
            };
            match input {
                Some(input) => {
                    // Clear so picking the same file again still fires `change`
                    input.set_value("");
                    input.click();
                }
                None => dispatch(handles, FlowEvent::Picked(None)),
            }
        }

        Effect::Analyze { attempt, image } => spawn_local(async move {
            let outcome = commands::analyze_image(image.base64, Some(image.file_name)).await;
            if let Err(e) = &outcome {
                web_sys::console::error_1(&format!("Analysis error: {}", e).into());
            }
            dispatch(handles, FlowEvent::AnalysisFinished { attempt, outcome });
        }),

        Effect::Notify { title, message } => browser::alert(&title, &message),
    }
}

#[component]
pub fn AnalysisPage() -> impl IntoView {
    let handles = FlowHandles {
        flow: RwSignal::new(Flow::new()),
        gallery_input: NodeRef::new(),
        camera_input: NodeRef::new(),
    };
    let flow = handles.flow;

    let (toast, set_toast) = signal::<Option<String>>(None);
    let toast_timer = StoredValue::new(None::<i32>);
    on_cleanup(move || {
        if let Some(id) = toast_timer.try_get_value().flatten() {
            browser::clear_timeout(id);
        }
    });

    let on_copy = Callback::new(move |(value, label): (String, String)| {
        spawn_local(async move {
            let message = match commands::copy_to_clipboard(&label, &value).await {
                Ok(()) => format!("{} copied to clipboard", label),
                Err(e) => format!("Copy failed: {}", e),
            };
            set_toast.set(Some(message));
            replace_toast_timer(toast_timer, browser::clear_timeout, || {
                browser::set_timeout(TOAST_MS, move || set_toast.set(None))
            });
        });
    });

    let on_file_change = move |ev: web_sys::Event| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));

        match file {
            Some(file) => spawn_local(async move {
                match browser::read_picked_file(file).await {
                    Ok(image) => dispatch(handles, FlowEvent::Picked(Some(image))),
                    Err(e) => {
                        web_sys::console::error_1(&format!("Failed to read image: {}", e).into());
                        dispatch(handles, FlowEvent::Picked(None));
                        browser::alert("Error", "Failed to read the selected image");
                    }
                }
            }),
            None => dispatch(handles, FlowEvent::Picked(None)),
        }
    };
    let cancel_picker = move || dispatch(handles, FlowEvent::Picked(None));

    let body = move || match flow.with(|f| f.state().clone()) {
        FlowState::Idle => view! {
            <div class="entry-buttons">
                <button
                    class="btn btn-primary btn-large"
                    on:click=move |_| dispatch(handles, FlowEvent::Start(ImageSource::Gallery))
                >
                    "Choose from Gallery"
                </button>
                <button
                    class="btn btn-secondary btn-large"
                    on:click=move |_| dispatch(handles, FlowEvent::Start(ImageSource::Camera))
                >
                    "Take Photo"
                </button>
            </div>
        }
        .into_any(),

        FlowState::AwaitingPermission(_) => view! {
            <div class="waiting-state">
                <p>"Requesting permission..."</p>
            </div>
        }
        .into_any(),

        FlowState::Picking(_) => view! {
            <div class="waiting-state">
                <p>"Waiting for an image..."</p>
                <button class="btn btn-secondary" on:click=move |_| cancel_picker()>
                    "Cancel"
                </button>
            </div>
        }
        .into_any(),

        FlowState::Loading { image, .. } => view! {
            <div class="analyzing-state">
                <img src=image.preview_url() class="preview-image analyzing" alt="Image being analyzed" />
                <div class="loading-indicator">
                    <div class="spinner"></div>
                    <p>"Analyzing image..."</p>
                    <p class="hint">"Large photos can take up to a couple of minutes"</p>
                </div>
            </div>
        }
        .into_any(),

        FlowState::ResultShown { image, report } => view! {
            <div class="analysis-results">
                <img src=image.preview_url() class="preview-image" alt="Analyzed image" />
                <ReportView report=report on_copy=on_copy />
                <button
                    class="btn btn-secondary btn-large"
                    on:click=move |_| dispatch(handles, FlowEvent::Reset)
                >
                    "Analyze Another Image"
                </button>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="page analysis-page">
            <style>{include_str!("analysis.css")}</style>

            <div class="hero">
                <h2 class="hero-title">"Color Analyzer"</h2>
                <p class="hero-subtitle">"Analyze colors from images and colorimetric strips"</p>
            </div>

            <input
                type="file"
                accept="image/*"
                style="display: none"
                node_ref=handles.gallery_input
                on:change=on_file_change
                on:cancel=move |_: web_sys::Event| cancel_picker()
            />
            <input
                type="file"
                accept="image/*"
                capture="environment"
                style="display: none"
                node_ref=handles.camera_input
                on:change=on_file_change
                on:cancel=move |_: web_sys::Event| cancel_picker()
            />

            {body}

            {move || toast.get().map(|message| view! { <div class="toast">{message}</div> })}
        </div>
    }
}
