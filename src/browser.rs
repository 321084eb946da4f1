//! Thin wrappers over the webview APIs used by the analysis flow.

use base64::Engine;
use js_sys::{ArrayBuffer, Object, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{PermissionState, PermissionStatus};

use crate::flow::{ImageSource, PickedImage};

/// Ask the webview whether `source` may be used.
///
/// The photo library needs no permission in a webview. For the camera only
/// an explicit "denied" counts as a refusal; browsers without the
/// Permissions API (or without the "camera" name) fall through to the OS
/// prompt shown by the capture input.
pub async fn request_permission(source: ImageSource) -> bool {
    match source {
        ImageSource::Gallery => true,
        ImageSource::Camera => match query_permission("camera").await {
            Ok(PermissionState::Denied) => false,
            Ok(_) => true,
            Err(e) => {
                web_sys::console::warn_1(&format!("Camera permission query failed: {}", e).into());
                true
            }
        },
    }
}

async fn query_permission(name: &str) -> Result<PermissionState, String> {
    let window = web_sys::window().ok_or("No window")?;
    let permissions = window
        .navigator()
        .permissions()
        .map_err(|e| format!("{:?}", e))?;

    let descriptor = Object::new();
    Reflect::set(&descriptor, &JsValue::from_str("name"), &JsValue::from_str(name))
        .map_err(|e| format!("{:?}", e))?;

    let promise = permissions.query(&descriptor).map_err(|e| format!("{:?}", e))?;
    let status: PermissionStatus = JsFuture::from(promise)
        .await
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|_| "Unexpected permission status")?;

    Ok(status.state())
}

/// Read a picked file into memory as base64.
pub async fn read_picked_file(file: web_sys::File) -> Result<PickedImage, String> {
    let array_buffer: ArrayBuffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Failed to convert to ArrayBuffer")?;

    let bytes = Uint8Array::new(&array_buffer).to_vec();
    if bytes.is_empty() {
        return Err(format!("{} is empty", file.name()));
    }

    Ok(PickedImage {
        file_name: file.name(),
        mime_type: file.type_(),
        base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
    })
}

/// Blocking alert with a title line.
pub fn alert(title: &str, message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&format!("{}\n\n{}", title, message));
    }
}

/// Run `f` once after `delay_ms`. Returns the handle for [`clear_timeout`].
pub fn set_timeout(delay_ms: i32, f: impl FnOnce() + 'static) -> Option<i32> {
    let window = web_sys::window()?;
    let callback = wasm_bindgen::closure::Closure::once(f);
    let id = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay_ms)
        .ok()?;
    callback.forget();
    Some(id)
}

pub fn clear_timeout(id: i32) {
    if let Some(window) = web_sys::window() {
        window.clear_timeout_with_handle(id);
    }
}
