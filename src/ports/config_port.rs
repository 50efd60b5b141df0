//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// All section names, in file order where the backend preserves it.
    fn sections(&self) -> Vec<String>;

    /// All keys of one section, in file order where the backend preserves it.
    fn section_keys(&self, section: &str) -> Vec<String>;
}
