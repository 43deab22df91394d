//! UI route handler — serves the embedded single-page form.
//!
//! The page is the presentation controller from the browser's side: one
//! topic input, one Generate action (click or Enter), and a mutually
//! exclusive idle/loading/success/failure state driven by `setState`.
//! The loading state doubles as the client-side re-entrancy guard; the
//! server's in-flight slot backs it up.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>SWOT Analysis Generator</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #0f0f0f; color: #e0e0e0;
      min-height: 100vh; padding: 2rem 1rem;
    }
    .wrap { max-width: 60rem; margin: 0 auto; }
    header { text-align: center; margin: 2.5rem 0 3rem; }
    h1 { font-size: 2rem; margin-bottom: 0.5rem; }
    header p { color: #888; font-size: 0.95rem; }
    .bar {
      display: flex; gap: 0.5rem; max-width: 38rem; margin: 0 auto 2rem;
      background: #1a1a1a; border: 1px solid #333; border-radius: 12px;
      padding: 0.4rem;
    }
    .bar:focus-within { border-color: #3a3a5a; }
    #topic {
      flex: 1; background: transparent; border: none; outline: none;
      color: #e0e0e0; font-size: 1rem; padding: 0.6rem 0.8rem;
    }
    #topic:disabled { opacity: 0.5; }
    #generate {
      min-width: 8rem; border: none; border-radius: 8px; cursor: pointer;
      background: #2a2a3a; color: #c0c0e0; font-size: 0.95rem;
      padding: 0.6rem 1.2rem; transition: background 0.15s;
    }
    #generate:hover:enabled { background: #3a3a5a; }
    #generate:disabled { cursor: not-allowed; color: #777; }
    #error {
      display: none; max-width: 38rem; margin: 0 auto 2rem;
      background: #2a1515; border: 1px solid #5a2a2a; border-radius: 8px;
      color: #e0a0a0; padding: 0.8rem 1rem; text-align: center;
    }
    #result {
      display: none; gap: 1rem;
      grid-template-columns: repeat(auto-fit, minmax(20rem, 1fr));
    }
    .panel {
      background: #1a1a1a; border: 1px solid #333; border-radius: 12px;
      border-top: 3px solid var(--accent); padding: 1.2rem 1.4rem;
    }
    .panel h2 { font-size: 1.05rem; color: var(--accent); margin-bottom: 0.8rem; }
    .panel ul { list-style: none; }
    .panel li { padding: 0.3rem 0 0.3rem 1.1rem; position: relative; color: #bbb; }
    .panel li::before { content: "\203A"; position: absolute; left: 0; color: #666; }
    .strengths     { --accent: #4ade80; }
    .weaknesses    { --accent: #f87171; }
    .opportunities { --accent: #60a5fa; }
    .threats       { --accent: #fbbf24; }
  </style>
</head>
<body>
  <div class="wrap">
    <header>
      <h1>SWOT Analysis Generator</h1>
      <p>Get an instant AI-powered SWOT analysis for any company or idea.</p>
    </header>
    <div class="bar">
      <input id="topic" type="text"
             placeholder="e.g. 'Tesla', 'a new local coffee shop', 'OpenAI'" />
      <button id="generate">Generate</button>
    </div>
    <div id="error"></div>
    <div id="result">
      <section class="panel strengths"><h2>Strengths</h2><ul></ul></section>
      <section class="panel weaknesses"><h2>Weaknesses</h2><ul></ul></section>
      <section class="panel opportunities"><h2>Opportunities</h2><ul></ul></section>
      <section class="panel threats"><h2>Threats</h2><ul></ul></section>
    </div>
  </div>
  <script>
    const topicEl = document.getElementById('topic');
    const buttonEl = document.getElementById('generate');
    const errorEl = document.getElementById('error');
    const resultEl = document.getElementById('result');
    const CATEGORIES = ['strengths', 'weaknesses', 'opportunities', 'threats'];

    // One mutually exclusive UI state: idle | loading | success | failure.
    let state = { kind: 'idle' };

    function setState(next) {
      state = next;
      const loading = state.kind === 'loading';
      topicEl.disabled = loading;
      buttonEl.disabled = loading;
      buttonEl.textContent = loading ? 'Generating…' : 'Generate';
      errorEl.style.display = state.kind === 'failure' ? 'block' : 'none';
      errorEl.textContent = state.kind === 'failure' ? 'Error: ' + state.message : '';
      resultEl.style.display = state.kind === 'success' ? 'grid' : 'none';
      if (state.kind === 'success') {
        for (const cat of CATEGORIES) {
          const ul = resultEl.querySelector('.' + cat + ' ul');
          ul.replaceChildren(...state.analysis[cat].map((point) => {
            const li = document.createElement('li');
            li.textContent = point;
            return li;
          }));
        }
      }
    }

    async function generate() {
      const topic = topicEl.value.trim();
      if (!topic || state.kind === 'loading') return;
      setState({ kind: 'loading' });
      try {
        const resp = await fetch('/api/analyze', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ topic }),
        });
        const data = await resp.json();
        if (!resp.ok) {
          throw new Error(data.message || 'An unexpected error occurred.');
        }
        setState({ kind: 'success', analysis: data });
      } catch (err) {
        setState({ kind: 'failure', message: err.message || 'An unexpected error occurred.' });
      }
    }

    buttonEl.addEventListener('click', generate);
    topicEl.addEventListener('keydown', (event) => {
      if (event.key === 'Enter') generate();
    });
  </script>
</body>
</html>
"#;

/// GET / — the single-page form.
pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
