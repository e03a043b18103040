// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Khotiyan — desktop image toolkit.
//
// Entry point. Initialises logging, services and app state, and launches the
// Dioxus UI. All processing happens locally; nothing is uploaded.

mod components;
mod pages;
mod services;
mod state;

use dioxus::prelude::*;
use khotiyan_core::ToolKind;

use pages::background::Background;
use pages::compress::Compress;
use pages::convert::Convert;
use pages::home::Home;
use pages::image_to_pdf::ImageToPdf;
use pages::pdf_to_image::PdfToImage;
use pages::resize::Resize;
use pages::settings::Settings;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Khotiyan starting");

    dioxus::launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(NavLayout)]
    #[route("/")]
    Home {},
    #[route("/resize")]
    Resize {},
    #[route("/convert")]
    Convert {},
    #[route("/compress")]
    Compress {},
    #[route("/pdf-to-image")]
    PdfToImage {},
    #[route("/image-to-pdf")]
    ImageToPdf {},
    #[route("/background-remove")]
    Background {},
    #[route("/settings")]
    Settings {},
}

impl Route {
    /// The page hosting `tool`.
    fn for_tool(tool: ToolKind) -> Self {
        match tool {
            ToolKind::Resize => Route::Resize {},
            ToolKind::Convert => Route::Convert {},
            ToolKind::Compress => Route::Compress {},
            ToolKind::PdfToImage => Route::PdfToImage {},
            ToolKind::ImageToPdf => Route::ImageToPdf {},
            ToolKind::RemoveBackground => Route::Background {},
        }
    }
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(AppServices::init);

    // Provide services and state as context for all pages
    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new(&svc)));

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent header with one link per tool.
#[component]
fn NavLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif; background: #f7f7f8;",

            header {
                style: "display: flex; align-items: center; gap: 16px; flex-wrap: wrap; padding: 10px 16px; border-bottom: 1px solid #e0e0e0; background: white;",
                Link { to: Route::Home {},
                    style: "font-weight: bold; font-size: 18px; color: #111; text-decoration: none; margin-right: 8px;",
                    "Khotiyan"
                }
                for tool in ToolKind::ALL {
                    Link { to: Route::for_tool(tool),
                        style: "color: #444; text-decoration: none; font-size: 14px;",
                        "{tool.title()}"
                    }
                }
                Link { to: Route::Settings {},
                    style: "margin-left: auto; color: #444; text-decoration: none; font-size: 14px;",
                    "Settings"
                }
            }

            main { class: "page-content",
                style: "flex: 1; width: 100%; max-width: 960px; margin: 0 auto; padding: 16px; box-sizing: border-box;",
                Outlet::<Route> {}
            }
        }
    }
}
