//! Error boundaries. Nothing in a listing may take the host page down with it.

use dioxus::prelude::*;

#[component]
pub fn GlobalErrorBoundary(boundary_name: ReadSignal<String>, children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: move |err: ErrorContext| {
                rsx! {
                    div {
                        class: "rsd-error-page",
                        h1 { "This listing could not be shown" }
                        p { "Boundary: {boundary_name}" }
                        a { href: "/", "Back to start" }
                        pre { "{err:#?}" }
                    }
                }
            },
            children
        }
    }
}

/// Catches a failing part of the page and offers to render it again.
#[component]
pub fn ComponentErrorBoundary(children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: |err: ErrorContext| {
                let error_txt = match err.error() {
                    Some(e) => format!("{:#?}", e.0),
                    None => "Unknown error".to_string(),
                };
                rsx! {
                    InlineError {
                        error_txt,
                        button {
                            class: "rsd-button",
                            onclick: move |_| {
                                err.clear_errors();
                            },
                            "Try again"
                        }
                    }
                }
            },
            {children}
        }
    }
}

/// Non-fatal error notice shown in place, next to whatever is still valid.
#[component]
pub fn InlineError(error_txt: ReadSignal<String>, children: Element) -> Element {
    rsx! {
        div {
            class: "rsd-inline-error",
            role: "alert",
            span { "{error_txt}" }
            {children}
        }
    }
}
