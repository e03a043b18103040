// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Building blocks shared by the tool pages.

use std::path::PathBuf;

use dioxus::prelude::*;
use khotiyan_core::{Quality, ToolKind};
use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::human_errors::humanize_error;
use khotiyan_core::naming::format_kb;

use crate::Route;
use crate::services::files::{Accept, PickedFile};

/// Status-line text for a failed action.
pub fn error_text(err: &KhotiyanError) -> String {
    tracing::warn!(error = %err, "action failed");
    humanize_error(err).one_line()
}

/// Value of a 0.1–1 quality slider. `None` for anything `Quality` rejects.
pub fn parse_quality(text: &str) -> Option<Quality> {
    text.trim().parse::<f32>().ok().and_then(|v| Quality::new(v).ok())
}

/// Title, blurb and the way back to the tool grid.
#[component]
pub fn ToolHeader(tool: ToolKind) -> Element {
    rsx! {
        div { style: "margin-bottom: 16px;",
            Link { to: Route::Home {},
                style: "color: #007aff; text-decoration: none; font-size: 14px;",
                "\u{2190} Back to Tools"
            }
            h1 { style: "margin: 8px 0 4px;", "{tool.title()}" }
            p { style: "color: #666; margin: 0;", "{tool.description()}" }
        }
    }
}

#[component]
pub fn ActionButton(
    #[props(into)] label: String,
    #[props(default)] disabled: bool,
    #[props(default)] secondary: bool,
    onclick: EventHandler<MouseEvent>,
) -> Element {
    let (bg, fg, border) = if secondary {
        ("white", "#007aff", "1px solid #007aff")
    } else {
        ("#007aff", "white", "none")
    };
    let opacity = if disabled { "0.5" } else { "1" };
    rsx! {
        button {
            style: "padding: 10px 16px; border-radius: 8px; border: {border}; background: {bg}; color: {fg}; font-size: 15px; opacity: {opacity}; cursor: pointer;",
            disabled: disabled,
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}

/// Large dashed target that opens a file dialog on click and takes files
/// dragged onto it. Only emits when at least one file was read.
#[component]
pub fn PickArea(
    #[props(into)] label: String,
    #[props(into)] hint: String,
    accept: Accept,
    onpick: EventHandler<Vec<PickedFile>>,
    onerror: EventHandler<KhotiyanError>,
) -> Element {
    let mut dragging = use_signal(|| false);
    let deliver = move |picked: Result<Vec<PickedFile>>| match picked {
        Ok(files) if files.is_empty() => {}
        Ok(files) => onpick.call(files),
        Err(e) => onerror.call(e),
    };
    let (border, bg) = if dragging() {
        ("2px solid #007aff", "#eaf3ff")
    } else {
        ("2px dashed #007aff", "white")
    };
    rsx! {
        button {
            style: "width: 100%; padding: 40px 16px; border-radius: 12px; border: {border}; color: #007aff; background: {bg}; font-size: 16px; cursor: pointer;",
            onclick: move |_| deliver(accept.pick()),
            ondragover: move |evt: DragEvent| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| dragging.set(false),
            ondrop: move |evt: DragEvent| {
                evt.prevent_default();
                dragging.set(false);
                let paths: Vec<PathBuf> = evt.files().iter().map(|file| file.path()).collect();
                deliver(accept.read_dropped(&paths));
            },
            div { "{label}" }
            div { style: "color: #888; font-size: 13px; margin-top: 6px;", "{hint}" }
        }
    }
}

/// An image with its name and size underneath.
#[component]
pub fn Preview(
    src: String,
    #[props(into)] caption: String,
    byte_len: u64,
    #[props(default)] checkered: bool,
) -> Element {
    let backdrop = if checkered {
        "background-color: #fff; background-image: linear-gradient(45deg, #ddd 25%, transparent 25%), linear-gradient(-45deg, #ddd 25%, transparent 25%), linear-gradient(45deg, transparent 75%, #ddd 75%), linear-gradient(-45deg, transparent 75%, #ddd 75%); background-size: 16px 16px; background-position: 0 0, 0 8px, 8px -8px, -8px 0;"
    } else {
        "background: #fff;"
    };
    rsx! {
        figure { style: "margin: 0; text-align: center;",
            div { style: "border: 1px solid #e0e0e0; border-radius: 8px; padding: 8px; {backdrop}",
                img { src: "{src}", style: "max-width: 100%; max-height: 360px; display: block; margin: 0 auto;" }
            }
            figcaption { style: "color: #666; font-size: 13px; margin-top: 6px;",
                "{caption} \u{00B7} {format_kb(byte_len)}"
            }
        }
    }
}

/// The page's single feedback line.
#[component]
pub fn StatusLine(message: Option<String>) -> Element {
    rsx! {
        if let Some(msg) = message {
            p { style: "margin-top: 12px; color: #555; font-size: 14px; text-align: center;",
                "{msg}"
            }
        }
    }
}
