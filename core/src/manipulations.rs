//! Ordered set of image manipulations and its wire encoding.
//!
//! # Design
//! Entries are kept in a small `Vec` rather than a map: the code set is
//! closed and tiny, and rendering must follow first-insertion order. Setting
//! a code that is already present overwrites its value in place, so the
//! token keeps the position it was first introduced at.
//!
//! There is no unset primitive. `set_fit(None)` writes `c_fit` and leaves
//! any gravity from an earlier `set_fit(Some(..))` untouched.

use crate::types::Value;

/// Short manipulation codes understood by the image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Width,
    Height,
    Crop,
    Gravity,
    Radius,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::Width => "w",
            Code::Height => "h",
            Code::Crop => "c",
            Code::Gravity => "g",
            Code::Radius => "r",
        }
    }
}

/// Manipulations accumulated for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManipulationSet {
    entries: Vec<(Code, Value)>,
}

impl ManipulationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_circle(&mut self, radius: impl Into<Value>) {
        self.set(Code::Radius, radius);
    }

    pub fn set_fit(&mut self, gravity: Option<&str>) {
        self.set(Code::Crop, "fit");
        if let Some(gravity) = gravity {
            self.set(Code::Gravity, gravity);
        }
    }

    pub fn set_height(&mut self, height: impl Into<Value>) {
        self.set(Code::Height, height);
    }

    pub fn set_width(&mut self, width: impl Into<Value>) {
        self.set(Code::Width, width);
    }

    /// Insert or overwrite `code`, keeping its original position.
    pub fn set(&mut self, code: Code, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((code, value)),
        }
    }

    pub fn get(&self, code: Code) -> Option<&Value> {
        self.entries.iter().find(|(c, _)| *c == code).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Code, &Value)> {
        self.entries.iter().map(|(c, v)| (*c, v))
    }

    /// Render as `code_value` tokens joined by commas. Empty when no
    /// manipulation was set.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(code, value)| format!("{}_{value}", code.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_renders_empty_string() {
        assert_eq!(ManipulationSet::new().render(), "");
    }

    #[test]
    fn renders_in_insertion_order() {
        let mut set = ManipulationSet::new();
        set.set_width(100);
        set.set_height(100);
        set.set_fit(Some("top"));
        set.set_circle(50);
        assert_eq!(set.render(), "w_100,h_100,c_fit,g_top,r_50");
    }

    #[test]
    fn overwrite_keeps_original_position() {
        let mut set = ManipulationSet::new();
        set.set_width(100);
        set.set_height(50);
        set.set_width(100);
        set.set_width(200);
        assert_eq!(set.render(), "w_200,h_50");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn fit_without_gravity_has_no_gravity_token() {
        let mut set = ManipulationSet::new();
        set.set_fit(None);
        assert_eq!(set.render(), "c_fit");
        assert!(set.get(Code::Gravity).is_none());
    }

    #[test]
    fn fit_without_gravity_keeps_earlier_gravity() {
        let mut set = ManipulationSet::new();
        set.set_fit(Some("top"));
        set.set_fit(None);
        assert_eq!(set.render(), "c_fit,g_top");
    }

    #[test]
    fn circle_accepts_text_radius() {
        let mut set = ManipulationSet::new();
        set.set_circle("max");
        assert_eq!(set.get(Code::Radius), Some(&Value::from("max")));
        assert_eq!(set.render(), "r_max");
    }
}
