#![windows_subsystem = "windows"]
#![allow(dead_code)] // API surface kept for future panels and headless tooling

#[macro_use]
mod i18n;
mod app;
mod assets;
mod cli;
mod components;
mod document;
pub mod logger;
mod ops;
mod project;

use std::process::ExitCode;

use app::CreoApp;
use clap::Parser;
use eframe::egui;

fn main() -> ExitCode {
    logger::init();
    i18n::init();

    // Headless rendering never opens a window.
    if cli::CliArgs::is_cli_mode() {
        return cli::run(cli::CliArgs::parse());
    }

    let settings = assets::AppSettings::load();
    if !settings.language.is_empty() {
        i18n::set_language(&settings.language);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 900.0])
            .with_min_inner_size([960.0, 600.0])
            .with_title("CreoTools"),
        ..Default::default()
    };
    let result = eframe::run_native(
        "CreoTools",
        options,
        Box::new(move |cc| Box::new(CreoApp::new(cc, settings))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("eframe failed to start: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
