//! Named drawable units and the registry that creates them by name.
//!
//! A `Figure` pairs geometry (`FigureAttrs`) with paint parameters
//! (`FigureStyles`) and the template that knows how to draw and hit-test
//! them. Views usually create figures per draw pass and drop them right
//! after drawing; animated content keeps one and mutates it with
//! `Figure::set_attrs`.

mod attrs;
mod builtin;

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::Coordinate;
use crate::error::ChartResult;
use crate::render::Canvas;

pub use attrs::{
    CircleAttrs, CircleStyles, FigureAttrs, FigureStyles, LineAttrs, LineStyles, PolygonAttrs,
    PolygonStyles, RectAttrs, RectStyles, TextAttrs, TextStyles,
};
pub use builtin::{CircleFigure, LineFigure, PolygonFigure, RectFigure, TextFigure};

/// Renderer for one kind of figure.
pub trait FigureTemplate {
    fn name(&self) -> &str;

    /// Whether `attrs`/`styles` describe a drawable figure of this kind.
    fn accepts(&self, attrs: &FigureAttrs, styles: &FigureStyles) -> bool;

    fn draw(
        &self,
        canvas: &mut dyn Canvas,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> ChartResult<()>;

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) -> bool;
}

/// Request passed to `FigureRegistry::create_figure`.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec<'a> {
    pub name: &'a str,
    pub attrs: FigureAttrs,
    pub styles: FigureStyles,
}

impl<'a> FigureSpec<'a> {
    #[must_use]
    pub fn new(name: &'a str, attrs: FigureAttrs, styles: FigureStyles) -> Self {
        Self {
            name,
            attrs,
            styles,
        }
    }
}

pub struct Figure {
    template: Rc<dyn FigureTemplate>,
    attrs: FigureAttrs,
    styles: FigureStyles,
}

impl Figure {
    #[must_use]
    pub fn name(&self) -> &str {
        self.template.name()
    }

    #[must_use]
    pub fn attrs(&self) -> &FigureAttrs {
        &self.attrs
    }

    #[must_use]
    pub fn styles(&self) -> &FigureStyles {
        &self.styles
    }

    /// Replaces the geometry in place. Attrs the template rejects are
    /// refused and the figure keeps its previous geometry.
    pub fn set_attrs(&mut self, attrs: FigureAttrs) -> bool {
        if !self.template.accepts(&attrs, &self.styles) {
            return false;
        }
        self.attrs = attrs;
        true
    }

    pub fn set_styles(&mut self, styles: FigureStyles) -> bool {
        if !self.template.accepts(&self.attrs, &styles) {
            return false;
        }
        self.styles = styles;
        true
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) -> ChartResult<()> {
        self.template.draw(canvas, &self.attrs, &self.styles)
    }

    #[must_use]
    pub fn check_event_on(&self, coordinate: Coordinate) -> bool {
        self.template
            .check_event_on(coordinate, &self.attrs, &self.styles)
    }
}

impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("name", &self.name())
            .field("attrs", &self.attrs)
            .field("styles", &self.styles)
            .finish()
    }
}

/// Figure templates keyed by name, in registration order.
#[derive(Clone, Default)]
pub struct FigureRegistry {
    templates: IndexMap<String, Rc<dyn FigureTemplate>>,
}

impl FigureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `line`, `circle`, `rect`, `text` and `polygon`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Rc::new(LineFigure));
        registry.register(Rc::new(CircleFigure));
        registry.register(Rc::new(RectFigure));
        registry.register(Rc::new(TextFigure));
        registry.register(Rc::new(PolygonFigure));
        registry
    }

    /// Registers `template` under its name, returning the template it replaced.
    pub fn register(
        &mut self,
        template: Rc<dyn FigureTemplate>,
    ) -> Option<Rc<dyn FigureTemplate>> {
        self.templates
            .insert(template.name().to_owned(), template)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Creates a figure, or `None` when the name is unknown or the template
    /// rejects the attrs. Absence means nothing to draw this pass.
    #[must_use]
    pub fn create_figure(&self, spec: FigureSpec<'_>) -> Option<Figure> {
        let Some(template) = self.templates.get(spec.name) else {
            debug!(name = spec.name, "unknown figure name");
            return None;
        };
        if !template.accepts(&spec.attrs, &spec.styles) {
            debug!(name = spec.name, "figure attrs rejected");
            return None;
        }
        Some(Figure {
            template: Rc::clone(template),
            attrs: spec.attrs,
            styles: spec.styles,
        })
    }
}

impl fmt::Debug for FigureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FigureRegistry")
            .field("names", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CircleAttrs, CircleStyles, FigureAttrs, FigureRegistry, FigureSpec, FigureStyles,
        LineAttrs, LineStyles,
    };
    use crate::core::Coordinate;
    use crate::render::{Color, LineStrokeStyle};

    fn circle(r: f64) -> FigureSpec<'static> {
        FigureSpec::new(
            "circle",
            FigureAttrs::Circle(CircleAttrs { x: 10.0, y: 10.0, r }),
            FigureStyles::Circle(CircleStyles {
                color: Some(Color::rgb(1.0, 0.0, 0.0)),
                border_color: Color::TRANSPARENT,
                border_size: 0.0,
            }),
        )
    }

    #[test]
    fn unknown_name_creates_nothing() {
        let registry = FigureRegistry::with_builtins();
        let mut spec = circle(3.0);
        spec.name = "arrow";
        assert!(registry.create_figure(spec).is_none());
    }

    #[test]
    fn mismatched_attrs_create_nothing() {
        let registry = FigureRegistry::with_builtins();
        let spec = FigureSpec::new(
            "line",
            FigureAttrs::Line(LineAttrs::polyline([Coordinate::new(0.0, 0.0)])),
            FigureStyles::Line(LineStyles {
                color: Color::rgb(0.0, 0.0, 0.0),
                size: 1.0,
                style: LineStrokeStyle::Solid,
            }),
        );
        assert!(registry.create_figure(spec).is_none());
    }

    #[test]
    fn set_attrs_refuses_invalid_geometry() {
        let registry = FigureRegistry::with_builtins();
        let mut figure = registry.create_figure(circle(3.0)).expect("circle");
        assert!(!figure.set_attrs(FigureAttrs::Circle(CircleAttrs {
            x: f64::NAN,
            y: 0.0,
            r: 1.0
        })));
        assert!(figure.set_attrs(FigureAttrs::Circle(CircleAttrs {
            x: 10.0,
            y: 10.0,
            r: 6.0
        })));
        assert!(figure.check_event_on(Coordinate::new(15.0, 10.0)));
        assert_eq!(figure.name(), "circle");
    }

    #[test]
    fn builtins_are_registered_in_order() {
        let registry = FigureRegistry::with_builtins();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["line", "circle", "rect", "text", "polygon"]);
    }
}
