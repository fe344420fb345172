// ============================================================
// Layer 1 — Layer Names
// ============================================================
// Layers that are not given a name get one from a per-prefix
// counter: the first unnamed feed-forward layer is
// `feed_forward`, the next `feed_forward_1`, and so on.
// Parameter names are derived from the layer name, e.g.
// `feed_forward_1_W1`.

use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

fn counters() -> &'static Mutex<HashMap<&'static str, usize>> {
    static COUNTERS: OnceLock<Mutex<HashMap<&'static str, usize>>> = OnceLock::new();
    COUNTERS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Next free name for the given prefix.
pub fn unique_name(prefix: &'static str) -> String {
    // A poisoned lock only means another thread panicked mid-increment;
    // the map itself is still usable.
    let mut map = counters().lock().unwrap_or_else(|e| e.into_inner());
    let n = map.entry(prefix).or_insert(0);
    let name = if *n == 0 { prefix.to_string() } else { format!("{prefix}_{n}") };
    *n += 1;
    name
}

/// Name of a parameter owned by a layer.
pub fn param_name(layer: &str, param: &str) -> String {
    format!("{layer}_{param}")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_per_prefix() {
        let a = unique_name("naming_test_layer");
        let b = unique_name("naming_test_layer");
        assert_ne!(a, b);
        assert!(b.starts_with("naming_test_layer_"));
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name("feed_forward", "W1"), "feed_forward_W1");
    }
}
