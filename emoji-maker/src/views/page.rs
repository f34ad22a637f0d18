use emoji_shared::types::EmojiRecord;

use super::escape;
use super::grid::{item_template, render_grid};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; justify-content: center; }
main { width: 100%; max-width: 42rem; padding: 5rem 2rem; display: flex; flex-direction: column; align-items: center; gap: 2rem; }
h1 { font-size: 1.875rem; margin: 0; }
form { display: flex; gap: 1rem; width: 100%; }
input[type=text] { flex: 1; padding: .5rem 1rem; border: 1px solid #d1d5db; border-radius: .5rem; }
button.generate { padding: .5rem 1.5rem; background: #3b82f6; color: #fff; border: 0; border-radius: .5rem; }
button.generate:disabled { opacity: .5; }
.grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; width: 100%; }
.cell.skeleton { aspect-ratio: 1; background: #f3f4f6; border-radius: .5rem; animation: pulse 2s infinite; }
.frame { position: relative; aspect-ratio: 1; }
.frame img { width: 100%; height: 100%; object-fit: cover; border-radius: .5rem; }
.overlay { position: absolute; inset: 0; display: flex; gap: .5rem; align-items: center; justify-content: center; opacity: 0; background: rgba(0,0,0,.5); border-radius: .5rem; }
.item:hover .overlay { opacity: 1; }
.overlay button { padding: .5rem; border-radius: 9999px; background: #fff; border: 0; cursor: pointer; }
.caption { display: flex; justify-content: space-between; margin-top: .5rem; font-size: .875rem; color: #6b7280; }
@keyframes pulse { 50% { opacity: .5; } }
"#;

/// Wires the form, the like and download buttons and the live insert stream.
const SCRIPT: &str = r#"
(() => {
  const gallery = document.getElementById('gallery');
  const template = document.getElementById('emoji-item');
  const form = document.getElementById('prompt-form');
  const button = form.querySelector('button');
  const input = form.querySelector('input');

  const HEART_ON = '#ef4444';

  function likesLabel(n) { return n === 1 ? '1 like' : n + ' likes'; }

  function paint(cell, emoji) {
    const liked = (emoji.likes_count ?? 0) !== 0;
    cell.classList.toggle('liked', liked);
    const heart = cell.querySelector('.heart');
    heart.setAttribute('fill', liked ? HEART_ON : 'none');
    heart.setAttribute('stroke', liked ? HEART_ON : 'black');
    cell.querySelector('.likes').textContent = likesLabel(emoji.likes_count ?? 0);
  }

  function prepend(emoji) {
    gallery.querySelectorAll('.skeleton').forEach((s) => s.remove());
    const cell = template.content.firstElementChild.cloneNode(true);
    cell.dataset.id = emoji.id;
    cell.dataset.url = emoji.image_url;
    const img = cell.querySelector('img');
    img.src = emoji.image_url;
    img.alt = emoji.prompt;
    cell.querySelector('.prompt').textContent = emoji.prompt;
    paint(cell, emoji);
    gallery.prepend(cell);
  }

  form.addEventListener('submit', async (e) => {
    e.preventDefault();
    button.disabled = true;
    button.textContent = 'Generating...';
    try {
      const res = await fetch('/api/generate', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ prompt: input.value }),
      });
      if (!res.ok) throw new Error((await res.json()).error);
    } catch (err) {
      console.error('Error generating emoji:', err);
    } finally {
      button.disabled = false;
      button.textContent = 'Generate';
      input.value = '';
    }
  });

  gallery.addEventListener('click', async (e) => {
    const cell = e.target.closest('.item');
    if (!cell) return;
    if (e.target.closest('.like')) {
      try {
        const res = await fetch('/api/emojis/' + cell.dataset.id + '/like', { method: 'POST' });
        if (!res.ok) throw new Error((await res.json()).error);
        paint(cell, await res.json());
      } catch (err) {
        console.error('Error toggling like:', err);
      }
    } else if (e.target.closest('.download')) {
      try {
        const blob = await (await fetch(cell.dataset.url)).blob();
        const href = URL.createObjectURL(blob);
        const link = document.createElement('a');
        link.href = href;
        link.download = 'emoji.png';
        document.body.appendChild(link);
        link.click();
        link.remove();
        URL.revokeObjectURL(href);
      } catch (err) {
        console.error('Error downloading emoji:', err);
      }
    }
  });

  const feed = new EventSource('/api/emojis/stream');
  feed.addEventListener('emoji.inserted', (e) => prepend(JSON.parse(e.data)));
  window.addEventListener('beforeunload', () => feed.close());
})();
"#;

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

/// Main page: prompt form over the shared gallery, newest first.
pub fn index_page(emojis: &[EmojiRecord]) -> String {
    let body = format!(
        r#"<main>
<h1>Emoji maker</h1>
<form id="prompt-form">
  <input type="text" name="prompt" placeholder="Enter prompt to generate emoji..." autocomplete="off">
  <button type="submit" class="generate">Generate</button>
</form>
{grid}
{template}
</main>
<script>{SCRIPT}</script>"#,
        grid = render_grid(emojis),
        template = item_template(),
    );
    layout("Emoji maker", &body)
}

/// Public landing page that hands off to the hosted sign-in portal.
pub fn sign_in_page(portal_url: Option<&str>, redirect_url: &str) -> String {
    let action = match portal_url {
        Some(portal) => {
            let encoded: String =
                url::form_urlencoded::byte_serialize(redirect_url.as_bytes()).collect();
            let separator = if portal.contains('?') { '&' } else { '?' };
            let href = format!("{portal}{separator}redirect_url={encoded}");
            format!(r#"<a class="sign-in" href="{}">Sign in</a>"#, escape(&href))
        }
        None => "<p>Sign-in is not configured for this deployment.</p>".to_string(),
    };
    let body = format!(
        r#"<main>
<h1>Emoji maker</h1>
<p>Sign in to generate emojis and browse the gallery.</p>
{action}
</main>"#
    );
    layout("Sign in · Emoji maker", &body)
}

pub fn not_found_page() -> String {
    layout("Not found", "<main><h1>404</h1><p>This page could not be found.</p></main>")
}
