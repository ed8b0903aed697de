use serde::Serialize;

/// Pages of the public site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Properties,
    PropertyDetail(String),
    Services,
    Testimonials,
    Contact,
    Admin,
    NotFound,
}

/// Navigation bar entries, in display order
pub const NAV: [Route; 6] = [
    Route::Home,
    Route::About,
    Route::Properties,
    Route::Services,
    Route::Testimonials,
    Route::Contact,
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: String,
    pub active: bool,
}

impl Route {
    /// Map a request path to the page that serves it
    pub fn resolve(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] | [""] => Route::Home,
            ["about"] => Route::About,
            ["properties"] => Route::Properties,
            ["properties", id] if !id.is_empty() => Route::PropertyDetail(id.to_string()),
            ["services"] => Route::Services,
            ["testimonials"] => Route::Testimonials,
            ["contact"] => Route::Contact,
            ["admin", ..] => Route::Admin,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Properties => "/properties".to_string(),
            Route::PropertyDetail(id) => format!("/properties/{id}"),
            Route::Services => "/services".to_string(),
            Route::Testimonials => "/testimonials".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::About => "About",
            Route::Properties | Route::PropertyDetail(_) => "Properties",
            Route::Services => "Services",
            Route::Testimonials => "Testimonials",
            Route::Contact => "Contact",
            Route::Admin => "Admin",
            Route::NotFound => "Not Found",
        }
    }

    /// The nav entry highlighted while this page is shown
    fn nav_section(&self) -> Option<Route> {
        match self {
            Route::PropertyDetail(_) => Some(Route::Properties),
            Route::Admin | Route::NotFound => None,
            other => Some(other.clone()),
        }
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        let section = self.nav_section();
        NAV.iter()
            .map(|route| NavLink {
                label: route.label(),
                path: route.path(),
                active: section.as_ref() == Some(route),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_every_public_path() {
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(Route::resolve("/about"), Route::About);
        assert_eq!(Route::resolve("/properties/"), Route::Properties);
        assert_eq!(Route::resolve("/properties/42"), Route::PropertyDetail("42".into()));
        assert_eq!(Route::resolve("/services"), Route::Services);
        assert_eq!(Route::resolve("/testimonials"), Route::Testimonials);
        assert_eq!(Route::resolve("/contact"), Route::Contact);
    }

    #[test]
    fn test_admin_prefix_and_unknown_paths() {
        assert_eq!(Route::resolve("/admin"), Route::Admin);
        assert_eq!(Route::resolve("/admin/properties/new"), Route::Admin);
        assert_eq!(Route::resolve("/properties/42/edit"), Route::NotFound);
        assert_eq!(Route::resolve("/blog"), Route::NotFound);
    }

    #[test]
    fn test_detail_page_highlights_properties_nav() {
        let links = Route::PropertyDetail("1".into()).nav_links();
        let active: Vec<&str> = links.iter().filter(|l| l.active).map(|l| l.label).collect();
        assert_eq!(active, vec!["Properties"]);
        assert!(Route::NotFound.nav_links().iter().all(|l| !l.active));
    }

    #[test]
    fn test_paths_resolve_back_to_their_route() {
        for route in NAV {
            assert_eq!(Route::resolve(&route.path()), route);
        }
    }
}
