mod app;
mod browser;
mod commands;
mod components;
mod flow;
mod pages;

use app::App;

fn main() {
    leptos::mount::mount_to_body(App);
}
