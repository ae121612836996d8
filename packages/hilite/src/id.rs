use rand::Rng;
use web_time::{SystemTime, UNIX_EPOCH};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a highlight id: `highlight-{unix millis}-{9 random base36 chars}`
pub fn generate_highlight_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();

    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("highlight-{millis}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_have_the_expected_shape() {
        let id = generate_highlight_id();
        let mut parts = id.splitn(3, '-');
        assert_eq!(parts.next(), Some("highlight"));
        assert!(parts.next().unwrap().chars().all(|c| c.is_ascii_digit()));
        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn ids_are_unique() {
        let a = generate_highlight_id();
        let b = generate_highlight_id();
        assert_ne!(a, b);
    }
}
