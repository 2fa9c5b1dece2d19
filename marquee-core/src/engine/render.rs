//! Frame drawing helpers

use core::fmt::Write;

use heapless::String;
use marquee_display::RenderSurface;
use marquee_protocol::{Rgb, MAX_LABEL_LEN, MAX_TEXT_LEN};

use crate::store::Message;
use crate::traits::LocalTime;

/// `label:text` of one message
type MessageLine = String<{ MAX_LABEL_LEN + 1 + MAX_TEXT_LEN }>;

/// Format `HH:MM`, with a blank separator on even seconds when blinking
pub fn clock_text(time: &LocalTime, blink_colon: bool) -> String<5> {
    let separator = if blink_colon && time.second % 2 == 0 {
        ' '
    } else {
        ':'
    };
    let mut text = String::new();
    let _ = write!(text, "{:02}{}{:02}", time.hour, separator, time.minute);
    text
}

/// Draw the clock face
pub fn draw_clock<R: RenderSurface>(
    surface: &mut R,
    time: &LocalTime,
    color: Rgb,
    x: i32,
    y: i32,
    blink_colon: bool,
) {
    surface.set_color(color);
    surface.set_cursor(x, y);
    surface.draw_text(&clock_text(time, blink_colon));
}

/// Draw one line of scrolling text and return its width
pub fn draw_scrolling<R: RenderSurface>(
    surface: &mut R,
    text: &str,
    color: Rgb,
    x: i32,
    y: i32,
) -> u32 {
    surface.set_color(color);
    surface.set_cursor(x, y);
    surface.draw_text(text);
    surface.measure_text_width(text)
}

/// Draw messages side by side starting at `x`
///
/// Each message is followed by `padding` blank pixels. Returns the total
/// width including the trailing padding.
pub fn draw_messages<'a, R, I>(surface: &mut R, messages: I, x: i32, y: i32, padding: u16) -> u32
where
    R: RenderSurface,
    I: IntoIterator<Item = &'a Message>,
{
    let mut total: u32 = 0;
    for message in messages {
        let line = message_line(message);
        let width = draw_scrolling(surface, &line, message.color, x + total as i32, y);
        total += width + padding as u32;
    }
    total
}

fn message_line(message: &Message) -> MessageLine {
    let mut line = MessageLine::new();
    let _ = line.push_str(&message.label);
    let _ = line.push(':');
    let _ = line.push_str(&message.text);
    line
}
