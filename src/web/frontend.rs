//! Embedded HTML/CSS/JS frontend for the seo-research web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>SEO Research Pro</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --cyan: #39d2c0;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.pill {
  display: inline-flex;
  align-items: center;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}
.pill.ok { border-color: var(--green); color: var(--green); }
.pill.err { border-color: var(--red); color: var(--red); }

/* Search form */
.search {
  display: grid;
  grid-template-columns: 1fr auto auto;
  gap: 12px;
  align-items: center;
}
.search input[type="text"], .search select {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 10px 12px;
  font-size: 14px;
}
.search input[type="text"]:focus, .search select:focus { outline: none; border-color: var(--accent); }
.search input.invalid { border-color: var(--red); }
.slider-row {
  display: flex;
  align-items: center;
  gap: 12px;
  margin-top: 12px;
  color: var(--text-muted);
  font-size: 13px;
}
.slider-row input[type="range"] { flex: 0 0 260px; }
.slider-row .value { font-family: var(--mono); color: var(--accent); min-width: 32px; }
.hint { color: var(--red); font-size: 12px; margin-top: 6px; min-height: 18px; }

/* Navigation */
nav {
  display: flex;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}
nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}
nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { background: var(--accent); color: #fff; }
nav button[hidden] { display: none; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }
.card h3 { font-size: 14px; font-weight: 600; margin: 12px 0 8px; color: var(--text-muted); }

.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}
.stat-card .value { font-size: 28px; font-weight: 700; font-family: var(--mono); color: var(--accent); }
.stat-card .value.green { color: var(--green); }
.stat-card .value.purple { color: var(--purple); }
.stat-card .value.cyan { color: var(--cyan); }
.stat-card .label {
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 6px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}
.stat-card .est { font-size: 11px; color: var(--yellow); margin-left: 4px; }

/* Keyword badges */
.badges { display: flex; flex-wrap: wrap; gap: 6px; }
.kw {
  padding: 3px 10px;
  border-radius: 12px;
  font-size: 12px;
  border: 1px solid var(--border);
}
.kw.merged { border-color: var(--green); color: var(--green); }
.kw.gemini { border-color: var(--purple); color: var(--purple); }
.kw.onpage { border-color: var(--accent); color: var(--accent); }

table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 8px 12px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 500; font-size: 12px; text-transform: uppercase; }
td.num { text-align: right; font-family: var(--mono); }
th.num { text-align: right; }
td.pass { color: var(--green); font-weight: 700; }
td.fail { color: var(--red); font-weight: 700; }
td.na { color: var(--text-muted); }

.btn {
  display: inline-flex;
  align-items: center;
  gap: 6px;
  padding: 10px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
.btn:hover { border-color: var(--accent); color: var(--accent); }
.btn.primary { background: var(--accent); color: #fff; border-color: var(--accent); }
.btn:disabled { opacity: 0.45; cursor: not-allowed; }
.btn-group { display: flex; gap: 8px; margin-bottom: 16px; }

.error-banner {
  display: flex;
  justify-content: space-between;
  align-items: center;
  background: rgba(248,81,73,0.1);
  border: 1px solid var(--red);
  color: var(--red);
  border-radius: var(--radius);
  padding: 12px 16px;
  margin-bottom: 16px;
}
.error-banner button { background: none; border: none; color: var(--red); cursor: pointer; font-size: 16px; }

.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 12px 20px;
  border-radius: var(--radius);
  background: var(--green);
  color: #fff;
  font-weight: 500;
  font-size: 13px;
  transform: translateY(80px);
  opacity: 0;
  transition: all 0.3s;
}
.toast.show { transform: translateY(0); opacity: 1; }
.toast.error { background: var(--red); }

.loading { display: flex; align-items: center; justify-content: center; padding: 40px; color: var(--text-muted); }
.spinner {
  width: 20px;
  height: 20px;
  border: 2px solid var(--border);
  border-top-color: var(--accent);
  border-radius: 50%;
  animation: spin 0.6s linear infinite;
  margin-right: 10px;
}
@keyframes spin { to { transform: rotate(360deg); } }

.panel { display: none; }
.panel.active { display: block; }
.empty { text-align: center; padding: 40px 20px; color: var(--text-muted); }
.muted { color: var(--text-muted); font-size: 12px; }

@media (max-width: 768px) {
  .search { grid-template-columns: 1fr; }
  .stats-grid { grid-template-columns: repeat(2, 1fr); }
  nav { flex-wrap: wrap; }
}
</style>
</head>
<body>
<div class="app">
  <header>
    <div>
      <h1><span class="logo">SEO</span> Research Pro</h1>
      <div class="subtitle">Keyword, content, technical and competitor insights for any page</div>
    </div>
    <span class="pill" id="backend-pill">backend: …</span>
  </header>

  <div class="card">
    <div class="search">
      <input type="text" id="url-input" placeholder="https://example.com/page" autocomplete="off">
      <select id="mode-select">
        <option value="keywords">Keywords</option>
        <option value="analyze" selected>Full analysis</option>
      </select>
      <button class="btn primary" id="btn-analyze" disabled>Analyze</button>
    </div>
    <div class="hint" id="url-hint"></div>
    <div class="slider-row" id="slider-row">
      <span>AI keywords</span>
      <input type="range" id="top-n" min="5" max="100" step="1" value="20">
      <span class="value" id="top-n-value">20</span>
    </div>
  </div>

  <div id="error-box"></div>
  <div id="loading" class="loading" style="display:none"><div class="spinner"></div>Analyzing…</div>

  <div id="results" style="display:none">
    <nav id="tabs">
      <button class="active" data-tab="overview">Overview</button>
      <button data-tab="keywords">Keywords</button>
      <button data-tab="content">Content</button>
      <button data-tab="technical">Technical SEO</button>
      <button data-tab="competitor">Competitor</button>
      <button data-tab="history">History</button>
    </nav>

    <div class="panel active" id="panel-overview">
      <div class="card">
        <h2 id="ov-title">—</h2>
        <div class="muted" id="ov-url"></div>
        <p style="margin-top:8px" id="ov-desc"></p>
      </div>
      <div class="stats-grid" id="ov-stats"></div>
    </div>

    <div class="panel" id="panel-keywords">
      <div class="btn-group">
        <button class="btn" id="btn-copy">Copy merged keywords</button>
        <button class="btn" id="btn-csv">Download CSV</button>
      </div>
      <div id="kw-groups"></div>
    </div>

    <div class="panel" id="panel-content">
      <div class="card"><h2>Heading Structure</h2><div id="headings"></div></div>
      <div class="card"><h2>Content Metrics</h2><table><tbody id="content-metrics"></tbody></table></div>
    </div>

    <div class="panel" id="panel-technical">
      <div class="card"><h2>Technical SEO Checklist</h2><table><tbody id="technical"></tbody></table></div>
    </div>

    <div class="panel" id="panel-competitor">
      <div class="stats-grid" id="competitor"></div>
      <p class="muted">est. = display estimate derived from a related metric</p>
    </div>

    <div class="panel" id="panel-history">
      <div class="stats-grid" id="history-stats"></div>
      <div class="card">
        <h2>Most Analyzed Sites</h2>
        <table>
          <thead><tr><th>Host</th><th class="num">Requests</th></tr></thead>
          <tbody id="history-hosts"></tbody>
        </table>
      </div>
    </div>
  </div>
</div>

<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

let loading = false;
let current = null;   // { dashboard, keywords } of the last success
let currentUrl = '';

const $ = id => document.getElementById(id);

function esc(s) {
  return String(s).replace(/[&<>"']/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]));
}

function toast(msg, isError) {
  const el = $('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function fmt(n) {
  if (n === undefined || n === null) return 'N/A';
  return n.toLocaleString();
}

function isValidUrl(s) {
  try {
    const u = new URL(s);
    return u.protocol.length > 1 && u.host.length > 0;
  } catch (_) {
    return false;
  }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

function syncForm() {
  const value = $('url-input').value;
  const valid = isValidUrl(value);
  $('btn-analyze').disabled = loading || !valid;
  $('url-input').classList.toggle('invalid', value.length > 0 && !valid);
  $('url-hint').textContent = value.length > 0 && !valid ? 'Enter an absolute URL such as https://example.com' : '';
  $('slider-row').style.display = $('mode-select').value === 'analyze' ? 'flex' : 'none';
}

$('url-input').addEventListener('input', syncForm);
$('url-input').addEventListener('keydown', e => { if (e.key === 'Enter' && !$('btn-analyze').disabled) submit(); });
$('mode-select').addEventListener('change', syncForm);
$('top-n').addEventListener('input', () => $('top-n-value').textContent = $('top-n').value);
$('btn-analyze').addEventListener('click', submit);

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

async function submit() {
  const url = $('url-input').value;
  const mode = $('mode-select').value;
  const params = new URLSearchParams({ url });
  if (mode === 'analyze') params.set('gemini_top_n', $('top-n').value);

  current = null;
  clearError();
  $('results').style.display = 'none';
  loading = true;
  $('loading').style.display = 'flex';
  syncForm();

  try {
    const res = await fetch(`/api/${mode}?${params}`);
    const body = await res.json();
    if (!res.ok) {
      showError(body.error || `HTTP error ${res.status}`);
    } else {
      current = body;
      currentUrl = url;
      render();
    }
  } catch (e) {
    showError('Failed to reach the dashboard server.');
  } finally {
    loading = false;
    $('loading').style.display = 'none';
    syncForm();
  }
}

function showError(message) {
  $('error-box').innerHTML =
    `<div class="error-banner"><span>${esc(message)}</span><button id="btn-dismiss" title="Dismiss">✕</button></div>`;
  $('btn-dismiss').addEventListener('click', clearError);
}

function clearError() {
  $('error-box').innerHTML = '';
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

$('tabs').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  selectTab(e.target.dataset.tab);
});

function selectTab(tab) {
  document.querySelectorAll('#tabs button').forEach(b => b.classList.toggle('active', b.dataset.tab === tab));
  document.querySelectorAll('.panel').forEach(p => p.classList.toggle('active', p.id === 'panel-' + tab));
  if (tab === 'history') loadHistory();
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

function statCard(value, label, cls, est) {
  return `<div class="stat-card"><div class="value ${cls || ''}">${esc(value)}${est ? '<span class="est">est.</span>' : ''}</div><div class="label">${esc(label)}</div></div>`;
}

function render() {
  const d = current.dashboard;
  const s = d.summary;

  document.querySelectorAll('#tabs button').forEach(b => {
    b.hidden = b.dataset.tab !== 'history' && !d.tabs.includes(b.dataset.tab);
  });

  $('ov-title').textContent = d.title;
  $('ov-url').textContent = d.url;
  $('ov-desc').textContent = d.meta_description;
  let stats =
    statCard(fmt(s.word_count), 'Words') +
    statCard(fmt(s.merged_keywords), 'Merged keywords', 'green') +
    statCard(fmt(s.gemini_keywords), 'AI keywords', 'purple') +
    statCard(fmt(s.onpage_keywords), 'On-page keywords', 'cyan');
  if (d.tabs.includes('technical')) {
    stats +=
      statCard(`${s.h1_count} / ${s.h2_count}`, 'H1 / H2') +
      statCard(`${s.technical_passed}/${s.technical_total}`, 'Technical checks passed', 'green');
  }
  $('ov-stats').innerHTML = stats;

  $('kw-groups').innerHTML = d.keywords.map(g => `
    <div class="card">
      <h2>${esc(g.label)} <span class="muted">(${g.count})</span></h2>
      <div class="badges">${g.keywords.length
        ? g.keywords.map(k => `<span class="kw ${g.provenance}">${esc(k)}</span>`).join('')
        : '<span class="muted">no keywords</span>'}</div>
    </div>`).join('');
  $('btn-copy').disabled = current.keywords.merged.length === 0;
  $('btn-csv').disabled =
    current.keywords.merged.length + current.keywords.gemini.length + current.keywords.onpage.length === 0;

  $('headings').innerHTML = d.headings.length
    ? d.headings.map(h => `<h3>${esc(h.tag.toUpperCase())} (${h.texts.length})</h3><ul style="margin-left:20px">${h.texts.map(t => `<li>${esc(t)}</li>`).join('')}</ul>`).join('')
    : '<div class="empty">No headings returned.</div>';
  $('content-metrics').innerHTML = d.content_metrics
    .map(m => `<tr><td>${esc(m.label)}</td><td class="num">${esc(m.display)}</td></tr>`).join('');

  $('technical').innerHTML = d.technical.length
    ? d.technical.map(c => `<tr><td class="${c.passed ? 'pass' : 'fail'}">${c.passed ? '✓' : '✗'}</td><td>${esc(c.label)}</td></tr>`).join('')
    : '<tr><td class="na">No technical checks returned.</td></tr>';

  $('competitor').innerHTML = d.competitor
    .map(m => statCard(m.display, m.label, m.value === null ? '' : 'cyan', m.derived)).join('');

  $('results').style.display = 'block';
  selectTab('overview');
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

$('btn-copy').addEventListener('click', async () => {
  if (!current || current.keywords.merged.length === 0) return;
  try {
    await navigator.clipboard.writeText(current.keywords.merged.join('\n'));
    toast(`Copied ${current.keywords.merged.length} keywords`);
  } catch (e) {
    toast('Clipboard unavailable: ' + e.message, true);
  }
});

$('btn-csv').addEventListener('click', async () => {
  if (!current) return;
  const res = await fetch('/api/export/csv', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ url: currentUrl, keywords: current.keywords }),
  });
  if (res.status === 204) return;
  if (!res.ok) {
    toast('Export failed', true);
    return;
  }
  const disposition = res.headers.get('Content-Disposition') || '';
  const match = disposition.match(/filename="([^"]+)"/);
  const blob = await res.blob();
  const link = document.createElement('a');
  link.href = URL.createObjectURL(blob);
  link.download = match ? match[1] : 'keywords.csv';
  link.click();
  URL.revokeObjectURL(link.href);
});

// ---------------------------------------------------------------------------
// History / health / config
// ---------------------------------------------------------------------------

async function loadHistory() {
  try {
    const h = await (await fetch('/api/history?days=30')).json();
    $('history-stats').innerHTML =
      statCard(fmt(h.total_requests), 'Requests (30 days)') +
      statCard(fmt(h.keyword_requests), 'Keyword runs', 'purple') +
      statCard(fmt(h.analyze_requests), 'Full analyses', 'cyan') +
      statCard(fmt(h.errors), 'Errors') +
      statCard(Math.round(h.avg_latency_ms) + ' ms', 'Avg latency', 'green');
    $('history-hosts').innerHTML = h.top_hosts
      .map(x => `<tr><td>${esc(x.host)}</td><td class="num">${x.count}</td></tr>`).join('');
  } catch (e) {
    toast('Failed to load history: ' + e.message, true);
  }
}

async function init() {
  try {
    const cfg = await (await fetch('/api/config')).json();
    const n = Math.min(100, Math.max(5, cfg.config.backend.default_top_n));
    $('top-n').value = n;
    $('top-n-value').textContent = n;
  } catch (_) {}

  try {
    const h = await (await fetch('/api/health')).json();
    const pill = $('backend-pill');
    pill.textContent = `backend: ${h.backend_url}`;
    pill.className = 'pill ' + (h.backend_ok ? 'ok' : 'err');
    pill.title = h.error || '';
  } catch (_) {}

  syncForm();
}

init();
</script>
</body>
</html>
"##;
