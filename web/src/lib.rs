use clap::Parser;
use wasm_bindgen::prelude::*;

mod drag;
mod host;
mod memory;
mod sequence;
mod settings;
mod thumbnail;
mod tile;
mod utils;
mod victory;
mod youtube;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    host: host::HostProps,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("host args: {:?}", args.host);

    let root = document()
        .get_element_by_id("cellar")
        .expect("Could not find id=\"cellar\" element");

    log::debug!("App started");
    yew::Renderer::<host::HostView>::with_root_and_props(root, args.host).render();
}
