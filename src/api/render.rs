//! Server-rendered HTML pages
//!
//! Minimal markup carrying the hooks the site's stylesheet expects:
//! `data-role` and `{role}-theme` on `<body>`, a `.role-indicator` in the
//! header, `.nav-menu` links and a `.login-form`.

use std::time::Duration;

use crate::router::{dashboard_path, rewrite_sidebar_href, PageKey, LOGIN_PATH};
use crate::session::{Role, Session};

/// Escape text for HTML element and attribute content
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One rendered page
#[derive(Debug, Default)]
pub struct Page<'a> {
    pub title: String,
    pub session: Option<&'a Session>,
    /// Trusted inner HTML for `<main>`
    pub body: String,
    /// Extra markup for `<head>`
    pub head: String,
}

impl<'a> Page<'a> {
    pub fn new(title: impl Into<String>, session: Option<&'a Session>) -> Self {
        Self {
            title: title.into(),
            session,
            ..Default::default()
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn head(mut self, head: impl Into<String>) -> Self {
        self.head = head.into();
        self
    }

    pub fn render(&self) -> String {
        let body_attrs = match self.session {
            Some(session) => format!(
                r#" data-role="{role}" class="{theme}""#,
                role = session.role.as_str(),
                theme = session.role.theme_class()
            ),
            None => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Community Platform</title>
{head}
</head>
<body{body_attrs}>
{header}
<main class="container">
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
            title = escape_html(&self.title),
            head = self.head,
            body_attrs = body_attrs,
            header = render_header(self.session),
            body = self.body,
        )
    }
}

fn nav_item(href: &str, label: &str, class: &str) -> String {
    format!(
        r#"<li class="nav-item{extra}"><a class="nav-link" href="{href}">{label}</a></li>"#,
        extra = if class.is_empty() {
            String::new()
        } else {
            format!(" {}", class)
        },
        href = escape_html(href),
        label = label
    )
}

fn render_header(session: Option<&Session>) -> String {
    let mut items = vec![
        nav_item("/", "Home", ""),
        nav_item("/community", "Community", ""),
        nav_item("/workspaces", "Workspaces", ""),
    ];

    let indicator = match session {
        Some(session) => {
            items.push(nav_item(
                &dashboard_path(session.role),
                "Dashboard",
                "dashboard-link",
            ));
            items.push(format!(
                r#"<li class="nav-item"><a class="nav-link profile-link" href="/profile" title="{title}"><span class="profile-avatar">{initial}</span>Profile</a></li>"#,
                title = escape_html(&format!(
                    "{} ({})",
                    session.username,
                    session.role.display_name()
                )),
                initial = session
                    .initial()
                    .map(|c| escape_html(&c.to_string()))
                    .unwrap_or_default(),
            ));
            items.push(r#"<li class="nav-item"><a class="nav-link logout-link" href="/logout">Logout</a></li>"#.to_string());
            format!(
                r#"<div class="role-indicator">{}</div>"#,
                session.role.display_name()
            )
        }
        None => {
            items.push(nav_item(LOGIN_PATH, "Login", ""));
            items.push(nav_item("/register", "Register", ""));
            String::new()
        }
    };

    format!(
        r#"<header class="header{role_header}"><div class="container header-container"><a class="brand" href="/">Community Platform</a><ul class="nav-menu">{items}</ul>{indicator}</div></header>"#,
        role_header = if session.is_some() { " role-header" } else { "" },
        items = items.join(""),
        indicator = indicator,
    )
}

/// Sidebar for role-scoped pages: in-page sections plus section links
/// rewritten into the role's path space
pub fn render_sidebar(role: Role, page: PageKey) -> String {
    let mut links: Vec<(String, &str)> = vec![
        (rewrite_sidebar_href(role, "#overview"), "Overview"),
        (rewrite_sidebar_href(role, "#activity"), "Activity"),
    ];

    for other in PageKey::all().iter().filter(|p| **p != page) {
        links.push((rewrite_sidebar_href(role, &format!("/{}", other)), other.title()));
    }

    let items: String = links
        .iter()
        .map(|(href, label)| {
            format!(
                r#"<li><a class="sidebar-link" href="{}">{}</a></li>"#,
                escape_html(href),
                label
            )
        })
        .collect();

    format!(r#"<aside class="sidebar"><ul>{}</ul></aside>"#, items)
}

/// Login form; also used on the registration page
pub fn render_login_form(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="form-error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();

    format!(
        r#"{error}<form id="login-form" class="login-form" method="post" action="/login">
<label for="username">Username</label>
<input id="username" name="username" type="text" required>
<label for="password">Password</label>
<input id="password" name="password" type="password">
<button type="submit">Log in</button>
</form>"#,
        error = error
    )
}

/// `<meta>` refresh forwarding to `target` after `delay`
pub fn refresh_meta(target: &str, delay: Duration) -> String {
    format!(
        r#"<meta http-equiv="refresh" content="{};url={}">"#,
        delay.as_secs_f64(),
        escape_html(target)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_logged_out_page() {
        let html = Page::new("Home", None).render();
        assert!(html.contains(r#"href="/login""#));
        assert!(!html.contains("data-role"));
        assert!(!html.contains("Logout"));
    }

    #[test]
    fn test_logged_in_page_carries_role() {
        let session = Session::new("musicbob", Role::MusicDirector);
        let html = Page::new("Dashboard", Some(&session)).render();

        assert!(html.contains(r#"data-role="music_director""#));
        assert!(html.contains("music_director-theme"));
        assert!(html.contains(r#"<div class="role-indicator">Music Director</div>"#));
        assert!(html.contains(r#"href="/music_director/dashboard""#));
        assert!(html.contains(r#"title="musicbob (Music Director)""#));
        assert!(html.contains("logout-link"));
    }

    #[test]
    fn test_username_is_escaped() {
        let session = Session::new("<script>editor", Role::Editor);
        let html = Page::new("Profile", Some(&session)).render();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;editor"));
    }

    #[test]
    fn test_sidebar_rewrites_section_links() {
        let html = render_sidebar(Role::Editor, PageKey::Dashboard);
        assert!(html.contains(r##"href="#overview""##));
        assert!(html.contains(r#"href="/editor/community""#));
        assert!(html.contains(r#"href="/editor/profile""#));
        assert!(!html.contains(r#"href="/editor/dashboard""#));
    }

    #[test]
    fn test_refresh_meta() {
        assert_eq!(
            refresh_meta("/login", Duration::from_millis(1000)),
            r#"<meta http-equiv="refresh" content="1;url=/login">"#
        );
    }
}
