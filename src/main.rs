mod catalog;
mod config;
mod desktop;
mod library;
mod preview;
mod runtime;
mod ui;
mod workflow;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
