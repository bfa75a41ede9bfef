mod api;
mod app;
mod components;
mod context;
mod logging;
mod pages;
mod storage;
mod theme;

use app::App;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    leptos::mount::mount_to_body(App);
}
