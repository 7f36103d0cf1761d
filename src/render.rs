//! HTML rendering for the dashboards.
//!
//! Every page is built from a [`RenderContext`], so navigation always lists
//! the same groups and reports as `/api/reports`.
//!
//! ## Pages
//!
//! - **Groups dashboard** (`/`, `/groups/`): one card per enabled group
//! - **Group dashboard** (`/groups/{id}/`): one card per enabled report
//!   visible in that group
//!
//! ## Navigation
//!
//! A slide-in panel lists every enabled group with its visible reports
//! underneath. The group being viewed carries the `current` class.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolation is escaped, which matters here because group and report
//! names come from user configuration.

use crate::nav::RenderContext;
use crate::types::Group;
use maud::{DOCTYPE, Markup, html};

/// Base stylesheet; color custom properties are prepended at startup.
pub const CSS_STATIC: &str = include_str!("../static/style.css");

const FONT_AWESOME: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(FONT_AWESOME);
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with breadcrumb and navigation
fn site_header(breadcrumb: Markup, nav: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
            nav.site-nav {
                (nav)
            }
        }
    }
}

/// Renders the navigation menu (hamburger style, slides from right)
pub fn render_nav(ctx: &RenderContext<'_>, current_group: Option<&str>) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        div.nav-panel {
            label.nav-close for="nav-toggle" { "×" }
            ul {
                li {
                    a href="/groups/" { "All Groups" }
                }
                @for group in ctx.enabled_groups() {
                    (render_nav_group(ctx, group, current_group))
                }
            }
        }
    }
}

fn render_nav_group(ctx: &RenderContext<'_>, group: &Group, current_group: Option<&str>) -> Markup {
    let is_current = current_group == Some(group.id.as_str());
    let reports = ctx.dashboard_reports(&group.id);

    html! {
        li class=[is_current.then_some("current")] {
            a.nav-group href=(group.url) { (group.name) }
            @if !reports.is_empty() {
                ul {
                    @for report in reports {
                        li {
                            a href=(report.url) { (report.name) }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the dashboard listing every enabled group
pub fn render_groups_dashboard(ctx: &RenderContext<'_>, css: &str) -> Markup {
    let nav = render_nav(ctx, None);
    let breadcrumb = html! {
        a href="/groups/" { "Reports" }
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.groups-page {
            h1 { "Report Groups" }
            p.lead { "Select a group to see its reports." }
            div.card-grid {
                @for group in ctx.enabled_groups() {
                    @let count = ctx.dashboard_reports(&group.id).len();
                    a.card href=(group.url) {
                        i class=(group.icon) {}
                        span.card-title { (group.name) }
                        span.card-description { (group.description) }
                        span.card-count {
                            (count) @if count == 1 { " report" } @else { " reports" }
                        }
                    }
                }
            }
        }
    };

    base_document("Report Groups", css, content)
}

/// Renders the dashboard of one group
pub fn render_group_dashboard(ctx: &RenderContext<'_>, group: &Group, css: &str) -> Markup {
    let nav = render_nav(ctx, Some(&group.id));
    let reports = ctx.dashboard_reports(&group.id);

    let breadcrumb = html! {
        a href="/groups/" { "Reports" }
        span.sep { "›" }
        a href=(group.url) { (group.name) }
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.group-page {
            h1 { (group.name) " Reports" }
            p.lead { (group.description) }
            @if reports.is_empty() {
                p.empty { "No reports are available in this group yet." }
            } @else {
                div.card-grid {
                    @for report in &reports {
                        a.card href=(report.url) {
                            i class=(report.icon) {}
                            span.card-title { (report.name) }
                            span.card-description { (report.description) }
                        }
                    }
                }
            }
        }
    };

    base_document(&format!("{} Reports", group.name), css, content)
}
