use cairo::{Context, Format, ImageSurface, Operator};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    BackingSize, Canvas, CanvasHost, CanvasLayer, CirclePrimitive, Color, LinePrimitive,
    LineStrokeStyle, Paint, PolygonPrimitive, RectPrimitive, TextHAlign, TextPrimitive,
    TextVAlign,
};

/// Canvas backed by an offscreen Cairo image surface.
///
/// The surface is reallocated at backing-store resolution on every resize and
/// the context carries the pixel-ratio scale, so callers draw in logical
/// pixels. Text goes through Pango.
#[derive(Debug)]
pub struct CairoCanvas {
    layer: CanvasLayer,
    surface: ImageSurface,
    context: Context,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    backing: BackingSize,
}

impl CairoCanvas {
    pub fn new(layer: CanvasLayer) -> ChartResult<Self> {
        let (surface, context) = allocate(BackingSize {
            width: 1,
            height: 1,
        })?;
        Ok(Self {
            layer,
            surface,
            context,
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            backing: BackingSize::default(),
        })
    }

    #[must_use]
    pub fn layer(&self) -> CanvasLayer {
        self.layer
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }
}

impl Canvas for CairoCanvas {
    fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn backing_size(&self) -> BackingSize {
        self.backing
    }

    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> ChartResult<()> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(ChartError::InvalidData(
                "pixel ratio must be finite and > 0".to_owned(),
            ));
        }
        let backing = BackingSize::for_logical(width, height, pixel_ratio);
        // Cairo refuses zero-sized image surfaces.
        let (surface, context) = allocate(BackingSize {
            width: backing.width.max(1),
            height: backing.height.max(1),
        })?;
        context.scale(pixel_ratio, pixel_ratio);
        self.surface = surface;
        self.context = context;
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.backing = backing;
        Ok(())
    }

    fn clear(&mut self) -> ChartResult<()> {
        let context = &self.context;
        context
            .save()
            .map_err(|err| map_backend_error("failed to save context", err))?;
        context.set_operator(Operator::Clear);
        let painted = context.paint();
        context
            .restore()
            .map_err(|err| map_backend_error("failed to restore context", err))?;
        painted.map_err(|err| map_backend_error("failed to clear surface", err))
    }

    fn stroke_line(&mut self, line: &LinePrimitive) -> ChartResult<()> {
        line.validate()?;
        let context = &self.context;
        apply_color(context, line.color);
        context.set_line_width(line.stroke_width);
        match line.stroke_style {
            LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
            LineStrokeStyle::Dashed { dash, gap } => context.set_dash(&[dash, gap], 0.0),
        }
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        let stroked = context.stroke();
        context.set_dash(&[], 0.0);
        stroked.map_err(|err| map_backend_error("failed to stroke line", err))
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> ChartResult<()> {
        circle.validate()?;
        let context = &self.context;
        context.new_sub_path();
        context.arc(circle.x, circle.y, circle.radius, 0.0, TAU);
        if let Some(fill) = circle.fill_color {
            apply_color(context, fill);
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill circle", err))?;
        }
        if circle.border_width > 0.0 {
            apply_color(context, circle.border_color);
            context.set_line_width(circle.border_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke circle border", err))?;
        } else {
            context.new_path();
        }
        Ok(())
    }

    fn draw_rect(&mut self, rect: &RectPrimitive) -> ChartResult<()> {
        rect.validate()?;
        let context = &self.context;
        append_rect_path(context, *rect);
        apply_color(context, rect.fill_color);
        if rect.border_width > 0.0 {
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            apply_color(context, rect.border_color);
            context.set_line_width(rect.border_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke rectangle border", err))
        } else {
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))
        }
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        text.validate()?;
        let context = &self.context;
        let layout = pangocairo::functions::create_layout(context);
        let font_description =
            FontDescription::from_string(&format!("{} {}", text.font_family, text.font_size_px));
        layout.set_font_description(Some(&font_description));
        layout.set_text(&text.text);

        let (text_width, text_height) = layout.pixel_size();
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };
        let y = match text.v_align {
            TextVAlign::Top => text.y,
            TextVAlign::Middle => text.y - f64::from(text_height) / 2.0,
            TextVAlign::Bottom => text.y - f64::from(text_height),
        };

        apply_color(context, text.color);
        context.move_to(x, y);
        pangocairo::functions::show_layout(context, &layout);
        Ok(())
    }

    fn fill_polygon(&mut self, polygon: &PolygonPrimitive) -> ChartResult<()> {
        polygon.validate()?;
        let context = &self.context;
        let mut points = polygon.points.iter();
        if let Some(first) = points.next() {
            context.move_to(first.x, first.y);
        }
        for point in points {
            context.line_to(point.x, point.y);
        }
        context.close_path();
        match &polygon.fill {
            Paint::Solid(color) => apply_color(context, *color),
            Paint::LinearGradient(gradient) => {
                let pattern = cairo::LinearGradient::new(
                    gradient.start.x,
                    gradient.start.y,
                    gradient.end.x,
                    gradient.end.y,
                );
                for stop in gradient.stops() {
                    pattern.add_color_stop_rgba(
                        stop.offset,
                        stop.color.red,
                        stop.color.green,
                        stop.color.blue,
                        stop.color.alpha,
                    );
                }
                context
                    .set_source(&pattern)
                    .map_err(|err| map_backend_error("failed to set gradient source", err))?;
            }
        }
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill polygon", err))
    }
}

/// Host creating offscreen Cairo canvases at a fixed device pixel ratio.
#[derive(Debug, Clone, Copy)]
pub struct CairoHost {
    pixel_ratio: f64,
}

impl CairoHost {
    #[must_use]
    pub fn new(pixel_ratio: f64) -> Self {
        Self { pixel_ratio }
    }
}

impl CanvasHost for CairoHost {
    type Canvas = CairoCanvas;

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn create_canvas(&mut self, layer: CanvasLayer) -> Option<Self::Canvas> {
        match CairoCanvas::new(layer) {
            Ok(canvas) => Some(canvas),
            Err(err) => {
                tracing::warn!(error = %err, ?layer, "cairo surface allocation failed");
                None
            }
        }
    }
}

fn allocate(size: BackingSize) -> ChartResult<(ImageSurface, Context)> {
    let width = i32::try_from(size.width)
        .map_err(|_| ChartError::Backend("cairo surface width overflows".to_owned()))?;
    let height = i32::try_from(size.height)
        .map_err(|_| ChartError::Backend("cairo surface height overflows".to_owned()))?;
    let surface = ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
    let context = Context::new(&surface)
        .map_err(|err| map_backend_error("failed to create cairo context", err))?;
    Ok((surface, context))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::CairoCanvas;
    use crate::render::{BackingSize, Canvas, CanvasLayer, CirclePrimitive, Color};

    #[test]
    fn resize_allocates_backing_store_at_pixel_ratio() {
        let mut canvas = CairoCanvas::new(CanvasLayer::Main).expect("surface");
        canvas.resize(40.0, 20.0, 2.0).expect("resize");
        assert_eq!(
            canvas.backing_size(),
            BackingSize {
                width: 80,
                height: 40
            }
        );
        assert_eq!(canvas.surface().width(), 80);
        canvas
            .draw_circle(&CirclePrimitive::filled(10.0, 10.0, 4.0, Color::rgb(1.0, 0.0, 0.0)))
            .expect("circle");
        canvas.clear().expect("clear");
    }
}
