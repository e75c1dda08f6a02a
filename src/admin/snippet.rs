//! Installable storefront snippet

use crate::registry::SiteKey;

const SNIPPET_TEMPLATE: &str = r#"<script>
(function () {
  fetch(__ENDPOINT__)
    .then(function (res) { return res.json(); })
    .then(function (data) {
      if (!data || data.status !== "OFF") return;
      var overlay = document.createElement("div");
      overlay.id = "kill-switch-overlay";
      overlay.style.cssText = "position:fixed;inset:0;z-index:2147483647;display:flex;align-items:center;justify-content:center;background:#fff;color:#333;font:20px sans-serif;text-align:center;padding:20px";
      overlay.textContent = data.message || "";
      var mount = function () {
        document.documentElement.style.overflow = "hidden";
        document.body.appendChild(overlay);
      };
      if (document.body) mount();
      else document.addEventListener("DOMContentLoaded", mount);
    })
    .catch(function () {});
})();
</script>"#;

/// Status check URL for a site key
pub fn check_status_url(base_url: &str, key: &SiteKey) -> String {
    format!("{}/check_status/{}", base_url.trim_end_matches('/'), key)
}

/// Script tag a storefront embeds to honour its kill switch.
///
/// Only an explicit OFF response blocks the page, so an unreachable service
/// leaves the storefront untouched.
pub fn install_snippet(base_url: &str, key: &SiteKey) -> String {
    SNIPPET_TEMPLATE.replace("__ENDPOINT__", &js_string(&check_status_url(base_url, key)))
}

/// Quote a value as a JS string literal that cannot close the script tag
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
