/// How often to check whether MathJax has finished loading.
const TYPESET_POLL_MS: u32 = 250;

/// Typeset math inside `root_id`, waiting for MathJax to load if it has not yet.
pub(super) fn typeset_script(root_id: &str) -> String {
    format!(
        r#"(function() {{
                    const state = window.__tutorTypeset || (window.__tutorTypeset = {{ id: null }});
                    const run = () => {{
                        const root = document.getElementById({root_id:?});
                        if (!root) return true;
                        const mj = window.MathJax;
                        if (!mj || !mj.typesetPromise) return false;
                        if (mj.typesetClear) mj.typesetClear([root]);
                        mj.typesetPromise([root]).catch((err) => console.warn("MathJax typeset failed", err));
                        return true;
                    }};
                    if (state.id) {{
                        clearInterval(state.id);
                        state.id = null;
                    }}
                    if (run()) return;
                    state.id = setInterval(() => {{
                        if (run()) {{
                            clearInterval(state.id);
                            state.id = null;
                        }}
                    }}, {TYPESET_POLL_MS});
                }})();"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_targets_root_and_polls() {
        let js = typeset_script("session-root");
        assert!(js.contains(r#"document.getElementById("session-root")"#));
        assert!(js.contains("}, 250);"));
    }
}
