//! Server-rendered HTML pages.
//!
//! The portal renders a handful of small pages inline; there is no client-side
//! application. Every user-provided value passes through [`escape`] before it
//! is interpolated.

use axum::response::Html;

use crate::api::handlers::auth::session::SessionClaims;
use crate::api::storage::{Employee, Subject};

/// Escape text for interpolation into HTML.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, claims: &SessionClaims, body: &str) -> Html<String> {
    let nav = if claims.authenticated {
        let mut links = String::new();
        if claims.admin {
            links.push_str("<a href=\"/users\">Employees</a> ");
        }
        links.push_str("<a href=\"/subjects\">Subjects</a> ");
        format!(
            "{links}<span>{} {}</span> <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>",
            escape(&claims.first_name),
            escape(&claims.last_name),
        )
    } else {
        "<a href=\"/signup\">Sign up</a>".to_string()
    };

    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} - Staffportal</title></head>\n\
         <body>\n\
         <nav><a href=\"/\">Home</a> {nav}</nav>\n\
         <main>\n{body}\n</main>\n\
         </body>\n\
         </html>\n"
    ))
}

/// Landing page, annotated with the caller's auth state. Anonymous visitors
/// get the login form inline.
#[must_use]
pub fn index(claims: &SessionClaims) -> Html<String> {
    let body = if claims.authenticated {
        format!("<h1>Welcome back, {}</h1>", escape(&claims.first_name))
    } else {
        "<h1>Welcome</h1>\n\
         <form method=\"post\" action=\"/login\">\n\
         <label>Email <input type=\"email\" name=\"email\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>"
            .to_string()
    };
    layout("Home", claims, &body)
}

/// Sign-up form page.
#[must_use]
pub fn signup(claims: &SessionClaims) -> Html<String> {
    let body = "<h1>Sign up</h1>\n\
        <form method=\"post\" action=\"/signup\">\n\
        <label>First name <input name=\"first_name\" required></label>\n\
        <label>Last name <input name=\"last_name\" required></label>\n\
        <label>Email <input type=\"email\" name=\"email\" required></label>\n\
        <label>Affiliation <input name=\"affiliation\" required></label>\n\
        <label>Username <input name=\"username\"></label>\n\
        <label>Password <input type=\"password\" name=\"password\" required></label>\n\
        <button type=\"submit\">Sign up</button>\n\
        </form>";
    layout("Sign up", claims, body)
}

/// Employee listing for administrators. Password hashes never reach the page.
#[must_use]
pub fn users(claims: &SessionClaims, employees: &[Employee]) -> Html<String> {
    let mut rows = String::new();
    for employee in employees {
        let username = employee.username.as_deref().unwrap_or("");
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&employee.first_name),
            escape(&employee.last_name),
            escape(&employee.email),
            escape(&employee.affiliation),
            escape(username),
            if employee.admin { "yes" } else { "no" },
        ));
    }
    let body = format!(
        "<h1>Employees</h1>\n\
         <table>\n\
         <tr><th>First name</th><th>Last name</th><th>Email</th>\
         <th>Affiliation</th><th>Username</th><th>Admin</th></tr>\n\
         {rows}</table>"
    );
    layout("Employees", claims, &body)
}

/// Subject listing; administrators also get the add-subject form.
#[must_use]
pub fn subjects(claims: &SessionClaims, subjects: &[Subject]) -> Html<String> {
    let mut items = String::new();
    for subject in subjects {
        items.push_str(&format!("<li>{}</li>\n", escape(&subject.name)));
    }
    let mut body = format!("<h1>Subjects</h1>\n<ul>\n{items}</ul>");
    if claims.is_admin() {
        body.push_str(
            "\n<form method=\"post\" action=\"/subjects\">\n\
             <label>Name <input name=\"name\" required></label>\n\
             <button type=\"submit\">Add subject</button>\n\
             </form>",
        );
    }
    layout("Subjects", claims, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_claims() -> SessionClaims {
        SessionClaims {
            authenticated: true,
            admin: true,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape(r#"<script>"&'"#),
            "&lt;script&gt;&quot;&amp;&#39;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn index_offers_login_to_anonymous_visitors() {
        let Html(page) = index(&SessionClaims::default());
        assert!(page.contains("action=\"/login\""));
        assert!(page.contains("Sign up"));
        assert!(!page.contains("Log out"));
    }

    #[test]
    fn index_greets_authenticated_visitors() {
        let Html(page) = index(&admin_claims());
        assert!(page.contains("Welcome back, Ada"));
        assert!(page.contains("Log out"));
        assert!(!page.contains("action=\"/login\""));
    }

    #[test]
    fn users_page_renders_rows_without_hashes() {
        let employees = vec![Employee {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: "$2b$14$secret-hash".to_string(),
            affiliation: "Navy".to_string(),
            username: Some("amazinggrace".to_string()),
            admin: false,
        }];
        let Html(page) = users(&admin_claims(), &employees);
        assert!(page.contains("grace@example.com"));
        assert!(page.contains("amazinggrace"));
        assert!(!page.contains("secret-hash"));
    }

    #[test]
    fn user_content_is_escaped() {
        let employees = vec![Employee {
            first_name: "<b>bold</b>".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: String::new(),
            affiliation: "Navy".to_string(),
            username: None,
            admin: false,
        }];
        let Html(page) = users(&admin_claims(), &employees);
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!page.contains("<b>bold</b>"));
    }

    #[test]
    fn subjects_page_shows_add_form_only_to_admins() {
        let listed = vec![Subject {
            name: "maths".to_string(),
        }];

        let Html(admin_page) = subjects(&admin_claims(), &listed);
        assert!(admin_page.contains("Add subject"));
        assert!(admin_page.contains("<li>maths</li>"));

        let mut member = admin_claims();
        member.admin = false;
        let Html(member_page) = subjects(&member, &listed);
        assert!(!member_page.contains("Add subject"));
    }
}
