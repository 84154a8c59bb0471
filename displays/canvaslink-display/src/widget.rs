//! Touch widgets
//!
//! Widgets are clickable screen areas that draw themselves through any
//! [`Canvas`]. The host keeps them in a [`WidgetRegistry`], redraws the dirty
//! ones after a screen change and feeds touch events back in.

use canvaslink_protocol::{ButtonStyle, Color, RoundedCornerStyle, TouchEvent};
use heapless::{String, Vec};

use crate::canvas::Canvas;
use crate::font::{FontTable, DEJAVU_SANS_9};

/// Longest button label
pub const MAX_LABEL_LEN: usize = 32;

/// Widget registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetError {
    /// A widget with this id is already registered
    Duplicate(u16),
    /// Registry is at capacity
    Full,
    /// Label exceeds [`MAX_LABEL_LEN`]
    LabelTooLong,
}

/// Clickable region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenArea {
    Rect {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },
    Circle {
        x: u16,
        y: u16,
        radius: u16,
    },
}

impl ScreenArea {
    /// Whether a touch at (px, py) lands inside the area
    ///
    /// Rectangles include their top/left edge and exclude bottom/right;
    /// circles exclude their rim.
    pub fn contains(&self, px: u16, py: u16) -> bool {
        match *self {
            ScreenArea::Rect {
                x,
                y,
                width,
                height,
            } => {
                let (px, py) = (px as u32, py as u32);
                px >= x as u32
                    && px < x as u32 + width as u32
                    && py >= y as u32
                    && py < y as u32 + height as u32
            }
            ScreenArea::Circle { x, y, radius } => {
                let dx = x.abs_diff(px) as u64;
                let dy = y.abs_diff(py) as u64;
                dx * dx + dy * dy < radius as u64 * radius as u64
            }
        }
    }
}

/// Button look-and-feel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonLook {
    pub text: String<MAX_LABEL_LEN>,
    pub font: &'static FontTable,
    pub border_color: Color,
    pub fill_color: Color,
    pub fill_color_clicked: Color,
    pub font_color: Color,
    pub font_color_clicked: Color,
    pub corner_style: RoundedCornerStyle,
}

impl ButtonLook {
    /// Black-on-white rounded button, inverted while clicked
    pub fn new(text: &str, font: &'static FontTable) -> Result<Self, WidgetError> {
        let mut label = String::new();
        label
            .push_str(if text.is_empty() { "?" } else { text })
            .map_err(|_| WidgetError::LabelTooLong)?;
        Ok(Self {
            text: label,
            font,
            border_color: Color::BLACK,
            fill_color: Color::WHITE,
            fill_color_clicked: Color::BLACK,
            font_color: Color::BLACK,
            font_color_clicked: Color::WHITE,
            corner_style: RoundedCornerStyle::All,
        })
    }
}

/// Clickable widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    id: u16,
    area: ScreenArea,
    active: bool,
    clicked: bool,
    dirty: bool,
    look: Option<ButtonLook>,
}

impl Widget {
    /// Plain widget drawn as a filled shape; starts active and dirty
    pub fn new(id: u16, area: ScreenArea) -> Self {
        Self {
            id,
            area,
            active: true,
            clicked: false,
            dirty: true,
            look: None,
        }
    }

    /// Rectangular button
    pub fn button(id: u16, x: u16, y: u16, width: u16, height: u16, look: ButtonLook) -> Self {
        Self {
            look: Some(look),
            ..Self::new(
                id,
                ScreenArea::Rect {
                    x,
                    y,
                    width,
                    height,
                },
            )
        }
    }

    /// Button with the default look in DejaVu Sans 9
    pub fn text_button(
        id: u16,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        text: &str,
    ) -> Result<Self, WidgetError> {
        Ok(Self::button(id, x, y, width, height, ButtonLook::new(text, &DEJAVU_SANS_9)?))
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn area(&self) -> &ScreenArea {
        &self.area
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_clicked(&self) -> bool {
        self.clicked
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Enable or disable touch handling; always clears the clicked state
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.set_clicked_state(false);
    }

    /// A clicked widget stops accepting touches until reactivated
    pub fn set_clicked(&mut self, clicked: bool) {
        self.set_clicked_state(clicked);
        if clicked {
            self.active = false;
        }
    }

    fn set_clicked_state(&mut self, clicked: bool) {
        if self.clicked != clicked {
            self.dirty = true;
        }
        self.clicked = clicked;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Feed a touch; returns whether the widget is now clicked
    pub fn on_touch(&mut self, event: &TouchEvent) -> bool {
        if self.active {
            self.set_clicked(self.area.contains(event.x, event.y));
        }
        self.clicked
    }

    /// Redraw if dirty
    pub fn draw<C: Canvas>(&mut self, canvas: &mut C) -> Result<(), C::Error> {
        if !self.dirty {
            return Ok(());
        }
        match (&self.look, self.area) {
            (
                Some(look),
                ScreenArea::Rect {
                    x,
                    y,
                    width,
                    height,
                },
            ) => {
                let (fill_color, font_color) = if self.clicked {
                    (look.fill_color_clicked, look.font_color_clicked)
                } else {
                    (look.fill_color, look.font_color)
                };
                let style = ButtonStyle {
                    x,
                    y,
                    width,
                    height,
                    border_color: look.border_color,
                    fill_color,
                    font_color,
                    corner_style: look.corner_style,
                };
                canvas.draw_button(&style, look.font, &look.text)?;
            }
            (
                _,
                ScreenArea::Rect {
                    x,
                    y,
                    width,
                    height,
                },
            ) => {
                canvas.draw_rectangle_filled(
                    x,
                    y,
                    x.saturating_add(width).saturating_sub(1),
                    y.saturating_add(height).saturating_sub(1),
                    self.state_color(),
                )?;
            }
            (_, ScreenArea::Circle { x, y, radius }) => {
                canvas.draw_circle_filled(x, y, radius, self.state_color())?;
            }
        }
        self.dirty = false;
        Ok(())
    }

    fn state_color(&self) -> Color {
        if self.clicked {
            Color::RED
        } else {
            Color::BLACK
        }
    }
}

/// Which widgets a render pass draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderScope {
    /// Every widget, dirty or not
    All,
    /// Only widgets whose state changed
    Dirty,
}

/// Ordered, bounded set of widgets
#[derive(Debug, Default)]
pub struct WidgetRegistry<const N: usize> {
    widgets: Vec<Widget, N>,
}

impl<const N: usize> WidgetRegistry<N> {
    pub fn new() -> Self {
        Self { widgets: Vec::new() }
    }

    pub fn register(&mut self, widget: Widget) -> Result<(), WidgetError> {
        if self.get(widget.id).is_some() {
            return Err(WidgetError::Duplicate(widget.id));
        }
        self.widgets.push(widget).map_err(|_| WidgetError::Full)
    }

    /// Remove a widget, keeping the order of the rest
    pub fn unregister(&mut self, id: u16) -> Option<Widget> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.remove(index))
    }

    pub fn unregister_all(&mut self) {
        self.widgets.clear();
    }

    pub fn get(&self, id: u16) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: u16) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Draw widgets in registration order
    pub fn render<C: Canvas>(
        &mut self,
        canvas: &mut C,
        scope: RenderScope,
    ) -> Result<(), C::Error> {
        for widget in self.widgets.iter_mut() {
            if scope == RenderScope::All {
                widget.mark_dirty();
            }
            widget.draw(canvas)?;
        }
        Ok(())
    }

    pub fn activate_all(&mut self, active: bool) {
        for widget in self.widgets.iter_mut() {
            widget.set_active(active);
        }
    }

    /// Offer a touch to every widget; returns the ids now clicked
    ///
    /// Invalid samples are ignored.
    pub fn on_touch(&mut self, event: &TouchEvent) -> Vec<u16, N> {
        let mut clicked = Vec::new();
        if !event.is_valid() {
            return clicked;
        }
        for widget in self.widgets.iter_mut() {
            if widget.on_touch(event) {
                // Same capacity as the registry
                let _ = clicked.push(widget.id);
            }
        }
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingMock};

    fn touch(x: u16, y: u16) -> TouchEvent {
        TouchEvent {
            x,
            y,
            pressure: 100,
            valid: 1,
        }
    }

    #[test]
    fn test_rect_area_edges() {
        let area = ScreenArea::Rect {
            x: 10,
            y: 10,
            width: 20,
            height: 5,
        };
        assert!(area.contains(10, 10));
        assert!(area.contains(29, 14));
        assert!(!area.contains(30, 14));
        assert!(!area.contains(10, 15));
        assert!(!area.contains(9, 10));
    }

    #[test]
    fn test_circle_area_excludes_rim() {
        let area = ScreenArea::Circle {
            x: 50,
            y: 50,
            radius: 10,
        };
        assert!(area.contains(50, 50));
        assert!(area.contains(59, 50));
        assert!(!area.contains(60, 50));
    }

    #[test]
    fn test_circle_area_far_touch() {
        let area = ScreenArea::Circle {
            x: 0,
            y: 0,
            radius: 10,
        };
        assert!(!area.contains(50000, 0));
        assert!(!area.contains(u16::MAX, u16::MAX));

        let edge = ScreenArea::Circle {
            x: u16::MAX,
            y: u16::MAX,
            radius: u16::MAX,
        };
        assert!(edge.contains(1, u16::MAX));
        assert!(!edge.contains(0, 0));

        let mut registry: WidgetRegistry<1> = WidgetRegistry::new();
        registry.register(Widget::new(1, area)).unwrap();
        assert!(registry.on_touch(&touch(60000, 60000)).is_empty());
    }

    #[test]
    fn test_click_deactivates() {
        let mut widget = Widget::new(
            1,
            ScreenArea::Rect {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
        );
        assert!(widget.on_touch(&touch(5, 5)));
        assert!(!widget.is_active());

        // Inactive widgets keep their state
        assert!(widget.on_touch(&touch(50, 50)));

        widget.set_active(true);
        assert!(!widget.is_clicked());
        assert!(!widget.on_touch(&touch(50, 50)));
    }

    #[test]
    fn test_registry_rejects_duplicates_and_overflow() {
        let mut registry: WidgetRegistry<2> = WidgetRegistry::new();
        let area = ScreenArea::Circle {
            x: 0,
            y: 0,
            radius: 1,
        };
        registry.register(Widget::new(1, area)).unwrap();
        assert_eq!(
            registry.register(Widget::new(1, area)),
            Err(WidgetError::Duplicate(1))
        );
        registry.register(Widget::new(2, area)).unwrap();
        assert_eq!(registry.register(Widget::new(3, area)), Err(WidgetError::Full));

        assert_eq!(registry.unregister(1).map(|w| w.id()), Some(1));
        assert_eq!(registry.unregister(1), None);
        registry.unregister_all();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_touch_dispatch_returns_clicked_ids() {
        let mut registry: WidgetRegistry<4> = WidgetRegistry::new();
        registry
            .register(Widget::text_button(7, 0, 0, 100, 40, "Left").unwrap())
            .unwrap();
        registry
            .register(Widget::text_button(8, 120, 0, 100, 40, "Right").unwrap())
            .unwrap();

        let invalid = TouchEvent {
            valid: 0,
            ..touch(10, 10)
        };
        assert!(registry.on_touch(&invalid).is_empty());

        let clicked = registry.on_touch(&touch(130, 20));
        assert_eq!(clicked.as_slice(), &[8]);
        assert!(registry.get(8).unwrap().is_clicked());
        assert!(!registry.get(7).unwrap().is_clicked());
    }

    #[test]
    fn test_render_dirty_only_once() {
        let mut registry: WidgetRegistry<4> = WidgetRegistry::new();
        registry
            .register(Widget::new(
                1,
                ScreenArea::Rect {
                    x: 10,
                    y: 20,
                    width: 30,
                    height: 40,
                },
            ))
            .unwrap();
        registry
            .register(Widget::new(
                2,
                ScreenArea::Circle {
                    x: 100,
                    y: 100,
                    radius: 15,
                },
            ))
            .unwrap();

        let mut canvas = RecordingMock::default();
        registry.render(&mut canvas, RenderScope::Dirty).unwrap();
        registry.render(&mut canvas, RenderScope::Dirty).unwrap();
        assert_eq!(
            canvas.calls,
            vec![
                Call::RectangleFilled(10, 20, 39, 59, Color::BLACK),
                Call::CircleFilled(100, 100, 15, Color::BLACK),
            ]
        );

        registry.on_touch(&touch(100, 100));
        registry.render(&mut canvas, RenderScope::Dirty).unwrap();
        assert_eq!(
            canvas.calls.last(),
            Some(&Call::CircleFilled(100, 100, 15, Color::RED))
        );

        canvas.calls.clear();
        registry.render(&mut canvas, RenderScope::All).unwrap();
        assert_eq!(canvas.calls.len(), 2);
    }

    #[test]
    fn test_button_draws_clicked_colors() {
        let mut widget = Widget::text_button(3, 5, 6, 70, 30, "Go").unwrap();
        widget.set_clicked(true);

        let mut canvas = RecordingMock::default();
        widget.draw(&mut canvas).unwrap();
        match &canvas.calls[0] {
            Call::Button(style, font_id, text) => {
                assert_eq!(style.fill_color, Color::BLACK);
                assert_eq!(style.font_color, Color::WHITE);
                assert_eq!(*font_id, DEJAVU_SANS_9.id);
                assert_eq!(text, "Go");
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert!(!widget.is_dirty());
    }
}
