//! The list page: search box, add form, and every note with inline edit and
//! delete forms. Self-contained HTML with inline CSS.

use crate::flash::Flash;
use crate::models::Note;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:48rem;\
margin:2rem auto;padding:0 1rem}\
input,textarea{width:100%;box-sizing:border-box;margin:.25rem 0}\
.note{border:1px solid #ddd;border-radius:6px;padding:.75rem;margin:.75rem 0}\
.meta{color:#777;font-size:.8rem}\
.flash{padding:.5rem .75rem;border-radius:4px}\
.flash.success{background:#e6f4ea}.flash.error{background:#fce8e6}";

pub fn render_index(notes: &[Note], query: &str, flash: Option<&Flash>) -> String {
    let flash_html = flash
        .map(|f| {
            format!(
                r#"<p class="flash {}">{}</p>"#,
                f.level.as_str(),
                escape_html(&f.message)
            )
        })
        .unwrap_or_default();

    let mut note_html = String::new();
    for note in notes {
        note_html.push_str(&render_note(note));
    }
    if note_html.is_empty() {
        note_html = if query.is_empty() {
            "<p>No notes yet.</p>".to_string()
        } else {
            format!("<p>No notes match &quot;{}&quot;.</p>", escape_html(query))
        };
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Notes</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Notes</h1>
{flash_html}
<form method="get" action="/">
<input type="search" name="q" value="{query}" placeholder="Search notes">
<button type="submit">Search</button>
</form>
<form method="post" action="/add">
<input type="text" name="title" placeholder="Title" required>
<textarea name="body" rows="3" placeholder="Note" required></textarea>
<button type="submit">Add note</button>
</form>
{note_html}
</body>
</html>
"#,
        query = escape_html(query),
    )
}

fn render_note(note: &Note) -> String {
    let title = escape_html(&note.title);
    let body = escape_html(&note.body);
    format!(
        r#"<div class="note" id="note-{id}">
<h2>{title}</h2>
<p>{body}</p>
<p class="meta">Created {created} &middot; Updated {updated}</p>
<details>
<summary>Edit</summary>
<form method="post" action="/edit/{id}">
<input type="text" name="title" value="{title}" required>
<textarea name="body" rows="3" required>{body}</textarea>
<button type="submit">Save</button>
</form>
</details>
<form method="post" action="/delete/{id}">
<button type="submit">Delete</button>
</form>
</div>
"#,
        id = note.id,
        created = note.created_at.format("%Y-%m-%d %H:%M UTC"),
        updated = note.updated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
