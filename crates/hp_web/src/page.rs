use std::fmt::Write as _;

use hp_core::types::FieldSpec;
use hp_core::{Neighborhood, NUMERIC_FIELDS};
use hp_model::ModelRegistry;

/// Server-rendered form page. The column split mirrors the training app's
/// layout: areas and counts on the left, scores and garage on the right.
pub fn render(registry: &ModelRegistry) -> String {
    let mut page = String::with_capacity(16 * 1024);
    page.push_str(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Predict House Price</title>
<style>
  body { font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }
  .columns { display: flex; gap: 2rem; }
  .columns > div { flex: 1; }
  label { display: block; margin-top: .75rem; font-size: .9rem; }
  input, select { width: 100%; box-sizing: border-box; margin-top: .25rem; }
  input[type=range] { padding: 0; }
  button { margin-top: 1.5rem; padding: .6rem 1.2rem; font-size: 1rem; }
  .banner { display: none; margin-top: 1.5rem; padding: 1rem; border-radius: .25rem; }
  #success { background: #e6f4ea; }
  #failure { background: #fce8e6; }
  .caption { color: #555; font-size: .85rem; margin-top: .5rem; }
</style>
</head>
<body>
<h1>🏡 Predict House Price</h1>
<p>House price estimation with multi-model comparison.</p>
<label for="model">Model</label>
<select id="model">
"#,
    );
    for name in registry.names() {
        let selected = if name == registry.default_name() {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(page, "<option{}>{}</option>", selected, name);
    }
    page.push_str("</select>\n<div class=\"columns\">\n<div>\n");
    let (left, right) = NUMERIC_FIELDS.split_at(5);
    for field in left {
        push_field(&mut page, field);
    }
    page.push_str("</div>\n<div>\n");
    for field in right {
        push_field(&mut page, field);
    }
    page.push_str("</div>\n</div>\n<label for=\"neighborhood\">Neighborhood</label>\n<select id=\"neighborhood\">\n");
    for neighborhood in Neighborhood::ALL {
        let _ = writeln!(page, "<option>{}</option>", neighborhood);
    }
    page.push_str(
        r#"</select>
<button id="submit"></button>
<div class="banner" id="success"><div id="estimate"></div><div class="caption" id="caption"></div></div>
<div class="banner" id="failure"></div>
<script>
const model = document.getElementById('model');
const button = document.getElementById('submit');
const success = document.getElementById('success');
const failure = document.getElementById('failure');

function relabel() { button.textContent = 'Estimate price with ' + model.value; }
model.addEventListener('change', relabel);
relabel();

document.querySelectorAll('input[type=range]').forEach(el => {
  const out = document.getElementById(el.id + '-value');
  el.addEventListener('input', () => { out.textContent = el.value; });
});

button.addEventListener('click', async () => {
  const input = {};
  document.querySelectorAll('[data-param]').forEach(el => {
    input[el.dataset.param] = Number(el.value);
  });
  input.neighborhood = document.getElementById('neighborhood').value;

  success.style.display = 'none';
  failure.style.display = 'none';
  const response = await fetch('/api/predict', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ model: model.value, input }),
  });
  const body = await response.json();
  if (response.ok) {
    document.getElementById('estimate').textContent = '💰 Estimated price: ' + body.formatted;
    document.getElementById('caption').textContent = 'Predicted using algorithm: ' + body.model;
    success.style.display = 'block';
  } else {
    failure.textContent = body.error + (body.hint ? ' — ' + body.hint : '');
    failure.style.display = 'block';
  }
});
</script>
</body>
</html>
"#,
    );
    page
}

fn push_field(page: &mut String, field: &FieldSpec) {
    match field.max {
        Some(max) => {
            let _ = writeln!(
                page,
                "<label for=\"{param}\">{label}: <span id=\"{param}-value\">{default}</span></label>\n\
                 <input type=\"range\" id=\"{param}\" data-param=\"{param}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{default}\">",
                param = field.param,
                label = field.label,
                min = field.min,
                max = max,
                default = field.default,
            );
        }
        None => {
            let _ = writeln!(
                page,
                "<label for=\"{param}\">{label}</label>\n\
                 <input type=\"number\" id=\"{param}\" data-param=\"{param}\" min=\"{min}\" step=\"1\" value=\"{default}\">",
                param = field.param,
                label = field.label,
                min = field.min,
                default = field.default,
            );
        }
    }
}
