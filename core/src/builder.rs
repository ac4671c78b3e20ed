//! Per-request builder: a source key plus the manipulations applied to it.
//!
//! # Design
//! A `RequestBuilder` is created by `Client::fetch` and replaced on the next
//! fetch, so manipulations never leak between requests. Every manipulation
//! method returns `&mut Self` for left-to-right chaining on the same builder.
//!
//! `Operation` is the closed set of built-in names that `Client::invoke`
//! resolves before consulting the macro registry.

use std::str::FromStr;

use crate::error::{ImaginaryError, Result};
use crate::manipulations::ManipulationSet;
use crate::types::Value;

/// Default circle radius: the largest circle that fits the image.
pub const MAX_RADIUS: &str = "max";

/// Builder for a single fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    source_key: String,
    manipulations: ManipulationSet,
}

impl RequestBuilder {
    pub fn new(source_key: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            manipulations: ManipulationSet::new(),
        }
    }

    /// Mask the image with a circle of the given radius.
    pub fn circle(&mut self, radius: impl Into<Value>) -> &mut Self {
        self.manipulations.set_circle(radius);
        self
    }

    /// Mask the image with the largest circle that fits.
    pub fn circle_max(&mut self) -> &mut Self {
        self.circle(MAX_RADIUS)
    }

    /// Fit the image when resizing, optionally anchored at `gravity`.
    pub fn fit(&mut self, gravity: Option<&str>) -> &mut Self {
        self.manipulations.set_fit(gravity);
        self
    }

    pub fn height(&mut self, height: u32) -> &mut Self {
        self.manipulations.set_height(height);
        self
    }

    pub fn width(&mut self, width: u32) -> &mut Self {
        self.manipulations.set_width(width);
        self
    }

    pub fn render_manipulations(&self) -> String {
        self.manipulations.render()
    }

    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    pub fn manipulations(&self) -> &ManipulationSet {
        &self.manipulations
    }
}

/// Built-in operations reachable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Circle,
    Fit,
    Height,
    Width,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Circle => "circle",
            Operation::Fit => "fit",
            Operation::Height => "height",
            Operation::Width => "width",
        }
    }

    /// Apply this operation to `builder` with dynamically supplied
    /// arguments. Surplus arguments are ignored.
    pub fn apply(self, builder: &mut RequestBuilder, args: &[Value]) -> Result<()> {
        let manipulations = &mut builder.manipulations;
        match self {
            Operation::Circle => {
                let radius = args.first().cloned().unwrap_or_else(|| MAX_RADIUS.into());
                manipulations.set_circle(radius);
            }
            Operation::Fit => {
                let gravity = args.first().map(Value::to_string);
                manipulations.set_fit(gravity.as_deref());
            }
            Operation::Height => manipulations.set_height(self.required(args, 0)?),
            Operation::Width => manipulations.set_width(self.required(args, 0)?),
        }
        Ok(())
    }

    fn required(self, args: &[Value], position: usize) -> Result<Value> {
        args.get(position)
            .cloned()
            .ok_or_else(|| ImaginaryError::MissingArgument {
                operation: self.name().to_string(),
                position,
            })
    }
}

impl FromStr for Operation {
    type Err = ImaginaryError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "circle" => Ok(Operation::Circle),
            "fit" => Ok(Operation::Fit),
            "height" => Ok(Operation::Height),
            "width" => Ok(Operation::Width),
            other => Err(ImaginaryError::DefinitionNotFound(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_calls_mutate_one_builder() {
        let mut builder = RequestBuilder::new("https://example.com/logo.jpg");
        builder.width(100).height(100).fit(Some("top")).circle(50);
        assert_eq!(builder.render_manipulations(), "w_100,h_100,c_fit,g_top,r_50");
        assert_eq!(builder.source_key(), "https://example.com/logo.jpg");
    }

    #[test]
    fn circle_max_uses_max_token() {
        let mut builder = RequestBuilder::new("a.jpg");
        builder.circle_max();
        assert_eq!(builder.render_manipulations(), "r_max");
    }

    #[test]
    fn operation_names_round_trip() {
        for op in [Operation::Circle, Operation::Fit, Operation::Height, Operation::Width] {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_operation_is_definition_not_found() {
        let err = "landscape".parse::<Operation>().unwrap_err();
        assert!(matches!(err, ImaginaryError::DefinitionNotFound(name) if name == "landscape"));
    }

    #[test]
    fn apply_defaults_circle_to_max() {
        let mut builder = RequestBuilder::new("a.jpg");
        Operation::Circle.apply(&mut builder, &[]).unwrap();
        assert_eq!(builder.render_manipulations(), "r_max");
    }

    #[test]
    fn apply_fit_with_and_without_gravity() {
        let mut builder = RequestBuilder::new("a.jpg");
        Operation::Fit.apply(&mut builder, &[]).unwrap();
        assert_eq!(builder.render_manipulations(), "c_fit");
        Operation::Fit.apply(&mut builder, &["top".into()]).unwrap();
        assert_eq!(builder.render_manipulations(), "c_fit,g_top");
    }

    #[test]
    fn apply_width_requires_an_argument() {
        let mut builder = RequestBuilder::new("a.jpg");
        let err = Operation::Width.apply(&mut builder, &[]).unwrap_err();
        assert!(matches!(
            err,
            ImaginaryError::MissingArgument { ref operation, position: 0 } if operation == "width"
        ));
        assert!(builder.manipulations().is_empty());
    }

    #[test]
    fn apply_ignores_surplus_arguments() {
        let mut builder = RequestBuilder::new("a.jpg");
        Operation::Height.apply(&mut builder, &[120.into(), "extra".into()]).unwrap();
        assert_eq!(builder.render_manipulations(), "h_120");
    }
}
