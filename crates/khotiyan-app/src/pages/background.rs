// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background removal page.

use dioxus::prelude::*;
use khotiyan_core::ToolKind;
use khotiyan_core::error::KhotiyanError;
use khotiyan_core::naming::no_background_name;
use khotiyan_document::remove_background;

use crate::components::{ActionButton, PickArea, Preview, StatusLine, ToolHeader, error_text};
use crate::services::app_services::{AppServices, run_blocking};
use crate::services::files::{self, Accept, PickedFile};
use crate::state::AppState;

#[component]
pub fn Background() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let mut source = use_signal(|| Option::<PickedFile>::None);
    let mut result = use_signal(|| Option::<Vec<u8>>::None);
    let mut busy = use_signal(|| false);
    let mut status = use_signal(|| Option::<String>::None);
    let result_url = use_memo(move || result.read().as_deref().map(files::data_url));

    let remove_label = if busy() { "Removing background..." } else { "Remove Background" };

    rsx! {
        div {
            ToolHeader { tool: ToolKind::RemoveBackground }

            if let Some(file) = source() {
                Preview {
                    src: file.preview.clone(),
                    caption: file.name.clone(),
                    byte_len: file.byte_len(),
                }

                div { style: "display: flex; gap: 8px; margin-top: 16px;",
                    ActionButton {
                        label: remove_label,
                        disabled: busy(),
                        onclick: {
                            let svc = svc.clone();
                            let bytes = file.bytes.clone();
                            move |_| {
                                let svc = svc.clone();
                                let bytes = bytes.clone();
                                busy.set(true);
                                status.set(None);
                                spawn(async move {
                                    let removed = run_blocking(move || {
                                        let remover = svc.remover()?;
                                        tracing::info!(remover = remover.name(), "removing background");
                                        remove_background(&bytes, remover.as_ref())
                                    })
                                    .await;
                                    match removed {
                                        Ok(png) => result.set(Some(png)),
                                        Err(e) => status.set(Some(error_text(&e))),
                                    }
                                    busy.set(false);
                                });
                            }
                        },
                    }
                    ActionButton {
                        label: "Choose Another",
                        secondary: true,
                        onclick: move |_| {
                            source.set(None);
                            result.set(None);
                            status.set(None);
                        },
                    }
                }

                if let Some(png) = result() {
                    {
                        let name = no_background_name(&file.name);
                        rsx! {
                            div { style: "margin-top: 24px;",
                                h3 { "Background removed" }
                                Preview {
                                    src: result_url().unwrap_or_default(),
                                    caption: name.clone(),
                                    byte_len: png.len() as u64,
                                    checkered: true,
                                }
                                div { style: "margin-top: 12px;",
                                    ActionButton {
                                        label: "Save",
                                        onclick: {
                                            let svc = svc.clone();
                                            let png = png.clone();
                                            let name = name.clone();
                                            move |_| match svc.save_output(ToolKind::RemoveBackground, &name, &png) {
                                                Ok(Some(record)) => {
                                                    status.set(Some(format!("Saved {}", record.file_name)));
                                                    state.write().record(record);
                                                }
                                                Ok(None) => {}
                                                Err(e) => status.set(Some(error_text(&e))),
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            } else {
                PickArea {
                    label: "Choose an image",
                    hint: "Works best on a plain, evenly lit backdrop",
                    accept: Accept::Image,
                    onpick: move |picked: Vec<PickedFile>| {
                        source.set(picked.into_iter().next());
                        result.set(None);
                        status.set(None);
                    },
                    onerror: move |e: KhotiyanError| status.set(Some(error_text(&e))),
                }
            }

            StatusLine { message: status() }
        }
    }
}
