// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Home page — the tool grid and this session's saved results.

use dioxus::prelude::*;
use khotiyan_core::ToolKind;
use khotiyan_core::naming::format_kb;

use crate::Route;
use crate::state::AppState;

#[component]
pub fn Home() -> Element {
    let mut state = use_context::<Signal<AppState>>();

    rsx! {
        div {
            h1 { "Khotiyan" }
            p { style: "color: #666;",
                "Resize, convert, compress and tidy up images and PDFs. Everything runs on this computer."
            }

            div { style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 12px; margin: 24px 0;",
                for tool in ToolKind::ALL {
                    ToolCard { tool }
                }
            }

            if !state.read().history.is_empty() {
                div { style: "display: flex; justify-content: space-between; align-items: center;",
                    h2 { "Saved this session" }
                    button {
                        style: "padding: 6px 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| state.write().clear_history(),
                        "Clear"
                    }
                }
                for record in state.read().history.iter() {
                    {
                        let short_hash = record.sha256.get(..12).unwrap_or(&record.sha256).to_string();
                        let time = record.created_at.format("%H:%M:%S").to_string();
                        rsx! {
                            div { key: "{record.id}",
                                style: "padding: 10px 12px; margin: 6px 0; border: 1px solid #e0e0e0; border-radius: 8px; background: white;",
                                strong { "{record.file_name}" }
                                p { style: "color: #666; font-size: 13px; margin: 4px 0 0;",
                                    "{record.tool.title()} \u{00B7} {format_kb(record.byte_len)} \u{00B7} {time} \u{00B7} sha256 {short_hash}\u{2026}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ToolCard(tool: ToolKind) -> Element {
    rsx! {
        Link { to: Route::for_tool(tool),
            style: "display: block; padding: 20px 16px; border: 1px solid #e0e0e0; border-radius: 12px; text-decoration: none; color: #333; background: white;",
            div { style: "font-size: 17px; font-weight: 600; margin-bottom: 6px;", "{tool.title()}" }
            div { style: "font-size: 14px; color: #666;", "{tool.description()}" }
        }
    }
}
