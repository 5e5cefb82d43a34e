use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Routes listed on the index page, in display order
pub const API_ROUTES: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

pub fn home_page(api_base: &str) -> Markup {
    let config = PageConfig {
        title: "Hawaii Climate API",
        api_base,
    };

    base(&config, content())
}

fn content() -> Markup {
    html! {
        p { "Available Routes:" }
        ul {
            @for route in API_ROUTES {
                li {
                    // parameterized routes are not directly followable
                    @if route.contains('<') {
                        code { (route) }
                    } @else {
                        a href=(route) { code { (route) } }
                    }
                }
            }
        }
        p { "Dates for " code { "<start>" } " and " code { "<end>" } " use the YYYY-MM-DD format." }
    }
}
