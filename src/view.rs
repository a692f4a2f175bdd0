//! Server-rendered HTML pages.

use std::fmt::Write;

use rocket::{request::FlashMessage, response::content::RawHtml};

use crate::model::db::{Candidate, Voter};

const TITLE: &str = "Online Voting System";

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared layout: stylesheet, navigation, and the
/// flash notice left by the previous request, if any.
fn page(heading: &str, flash: Option<FlashMessage<'_>>, body: &str) -> RawHtml<String> {
    let notice = flash
        .map(|flash| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                escape(flash.kind()),
                escape(flash.message()),
            )
        })
        .unwrap_or_default();

    RawHtml(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{TITLE}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<nav>
<a href="/">Home</a>
<a href="/register">Register</a>
<a href="/login">Login</a>
<a href="/results">Results</a>
<a href="/logout">Logout</a>
</nav>
<main>
<h2>{}</h2>
{notice}
{body}
</main>
</body>
</html>
"#,
        escape(heading),
    ))
}

pub fn index(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    page(
        TITLE,
        flash,
        r#"<p>Register once, log in, and cast your vote for one candidate.</p>
<p><a class="button" href="/register">Register</a> <a class="button" href="/login">Login</a> <a class="button" href="/results">View Results</a></p>"#,
    )
}

pub fn register(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    page(
        "Voter Registration",
        flash,
        r#"<form method="post" action="/register">
<label>Voter ID <input type="text" name="voter_id" required></label>
<label>Name <input type="text" name="name" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Register</button>
</form>"#,
    )
}

pub fn login(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    page(
        "Voter Login",
        flash,
        r#"<form method="post" action="/login">
<label>Voter ID <input type="text" name="voter_id" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Login</button>
</form>"#,
    )
}

/// The ballot: one submit button per candidate.
pub fn vote(
    voter: &Voter,
    candidates: &[Candidate],
    flash: Option<FlashMessage<'_>>,
) -> RawHtml<String> {
    let mut body = format!(
        "<p>Welcome, {}. Choose one candidate.</p>\n<form method=\"post\" action=\"/vote\">\n",
        escape(&voter.name),
    );
    for candidate in candidates {
        // Writing to a `String` cannot fail.
        let _ = writeln!(
            body,
            r#"<div class="candidate-card"><h4>{name}</h4><button type="submit" name="candidate" value="{id}">Vote for {name}</button></div>"#,
            name = escape(&candidate.name),
            id = candidate.id,
        );
    }
    body.push_str("</form>");
    page("Cast Your Vote", flash, &body)
}

/// The tally, in the order given.
pub fn results(candidates: &[Candidate]) -> RawHtml<String> {
    let mut body = String::new();
    for candidate in candidates {
        let _ = writeln!(
            body,
            r#"<div class="candidate-card"><h4>{}</h4><p>Votes: <strong>{}</strong></p></div>"#,
            escape(&candidate.name),
            candidate.votes,
        );
    }
    page("Election Results", None, &body)
}

pub fn thank_you() -> RawHtml<String> {
    page(
        "Thank You for Voting!",
        None,
        r#"<p>Your vote has been recorded.</p><p><a href="/results">See the results</a></p>"#,
    )
}

pub fn already_voted() -> RawHtml<String> {
    page(
        "Already Voted",
        None,
        r#"<p>You have already voted. Each voter may vote only once.</p><p><a href="/results">See the results</a></p>"#,
    )
}
