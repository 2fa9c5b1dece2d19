//! Control requests and replies
//!
//! Verb paths:
//! - `/brightness`, `/scrollSpeed`, `/color`: get, or set when `value` given
//! - `/setAlert`, `/clearAlert`: priority alert
//! - `/setMessage`, `/clearMessage`: rotating message slots
//! - `/setTime`: wall-clock resynchronization from the network bridge

use core::fmt::{self, Write};

use heapless::String;

use crate::args::{Args, ProtocolError};
use crate::color::Rgb;

/// Maximum request line length
pub const MAX_LINE_LEN: usize = 256;

/// Maximum message label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum alert or message text length
pub const MAX_TEXT_LEN: usize = 64;

/// Maximum reply body length
pub const MAX_REPLY_LEN: usize = 48;

/// Latest accepted `/setTime` epoch (2106-02-07)
pub const MAX_EPOCH_S: u64 = u32::MAX as u64;

/// Message label storage
pub type LabelText = String<MAX_LABEL_LEN>;

/// Alert and message text storage
pub type MessageText = String<MAX_TEXT_LEN>;

// Verb paths
pub const PATH_BRIGHTNESS: &str = "/brightness";
pub const PATH_SCROLL_SPEED: &str = "/scrollSpeed";
pub const PATH_COLOR: &str = "/color";
pub const PATH_SET_ALERT: &str = "/setAlert";
pub const PATH_CLEAR_ALERT: &str = "/clearAlert";
pub const PATH_SET_MESSAGE: &str = "/setMessage";
pub const PATH_CLEAR_MESSAGE: &str = "/clearMessage";
pub const PATH_SET_TIME: &str = "/setTime";

/// A decoded control request
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlRequest {
    /// Read brightness, or set it when a value is given
    Brightness { value: Option<i64> },
    /// Read scroll speed (px/s), or set it when a value is given
    ScrollSpeed { value: Option<f32> },
    /// Read primary color, or set it when a value is given
    Color { value: Option<Rgb> },
    /// Replace the alert
    SetAlert {
        text: MessageText,
        color: Option<Rgb>,
        timeout_ms: Option<u32>,
    },
    /// Remove the alert
    ClearAlert,
    /// Overwrite and enable a message slot
    SetMessage {
        index: i64,
        label: LabelText,
        text: MessageText,
        color: Rgb,
    },
    /// Disable a message slot
    ClearMessage { index: i64 },
    /// Synchronize the wall clock to a unix timestamp
    SetTime { epoch_s: u64 },
}

impl ControlRequest {
    /// Decode a request line
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let target = request_target(line)?;
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let args = Args::new(query);

        match path {
            PATH_BRIGHTNESS => Ok(ControlRequest::Brightness {
                value: args.int("value")?,
            }),
            PATH_SCROLL_SPEED => Ok(ControlRequest::ScrollSpeed {
                value: args.number("value")?,
            }),
            PATH_COLOR => Ok(ControlRequest::Color {
                value: args.color("value")?,
            }),
            PATH_SET_ALERT => {
                let text = args.require_text("text")?;
                let color = args.color("color")?;
                let timeout_ms = match args.int("timeout")? {
                    Some(ms) => Some(
                        u32::try_from(ms).map_err(|_| ProtocolError::InvalidArgument("timeout"))?,
                    ),
                    None => None,
                };
                Ok(ControlRequest::SetAlert {
                    text,
                    color,
                    timeout_ms,
                })
            }
            PATH_CLEAR_ALERT => Ok(ControlRequest::ClearAlert),
            PATH_SET_MESSAGE => {
                // All four are required; report the first missing one
                let index = args.require_int("index")?;
                let label = args.require_text("label")?;
                let text = args.require_text("text")?;
                let color = args.require_color("color")?;
                Ok(ControlRequest::SetMessage {
                    index,
                    label,
                    text,
                    color,
                })
            }
            PATH_CLEAR_MESSAGE => Ok(ControlRequest::ClearMessage {
                index: args.require_int("index")?,
            }),
            PATH_SET_TIME => {
                let epoch = args.require_int("epoch")?;
                let epoch_s = u64::try_from(epoch)
                    .ok()
                    .filter(|&e| e <= MAX_EPOCH_S)
                    .ok_or(ProtocolError::InvalidArgument("epoch"))?;
                Ok(ControlRequest::SetTime { epoch_s })
            }
            _ => Err(ProtocolError::UnknownVerb),
        }
    }

    /// Verb path of this request
    pub fn path(&self) -> &'static str {
        match self {
            ControlRequest::Brightness { .. } => PATH_BRIGHTNESS,
            ControlRequest::ScrollSpeed { .. } => PATH_SCROLL_SPEED,
            ControlRequest::Color { .. } => PATH_COLOR,
            ControlRequest::SetAlert { .. } => PATH_SET_ALERT,
            ControlRequest::ClearAlert => PATH_CLEAR_ALERT,
            ControlRequest::SetMessage { .. } => PATH_SET_MESSAGE,
            ControlRequest::ClearMessage { .. } => PATH_CLEAR_MESSAGE,
            ControlRequest::SetTime { .. } => PATH_SET_TIME,
        }
    }

    /// Returns true if this request only reads state
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            ControlRequest::Brightness { value: None }
                | ControlRequest::ScrollSpeed { value: None }
                | ControlRequest::Color { value: None }
        )
    }
}

/// Strip an optional method and protocol version from a request line
fn request_target(line: &str) -> Result<&str, ProtocolError> {
    let mut target = line.trim();

    if let Some((method, rest)) = target.split_once(' ') {
        if method.bytes().all(|b| b.is_ascii_uppercase()) {
            target = rest.trim_start();
        }
    }

    if let Some((rest, version)) = target.rsplit_once(' ') {
        if version.starts_with("HTTP/") {
            target = rest.trim_end();
        }
    }

    if !target.starts_with('/') || target.contains(' ') {
        return Err(ProtocolError::Malformed);
    }

    Ok(target)
}

/// Reply status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
}

impl Status {
    /// HTTP-style status code
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
        }
    }
}

/// Reply to a control request
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlReply {
    pub status: Status,
    pub body: String<MAX_REPLY_LEN>,
}

impl ControlReply {
    /// Build a reply from anything printable
    ///
    /// Bodies longer than `MAX_REPLY_LEN` are cut short.
    pub fn new(status: Status, body: impl fmt::Display) -> Self {
        let mut text = String::new();
        let _ = write!(text, "{}", body);
        Self { status, body: text }
    }

    pub fn ok(body: impl fmt::Display) -> Self {
        Self::new(Status::Ok, body)
    }

    pub fn bad_request(body: impl fmt::Display) -> Self {
        Self::new(Status::BadRequest, body)
    }

    /// Check if the request succeeded
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Encode as `"<code> <body>\n"`
    pub fn encode(&self) -> String<{ MAX_REPLY_LEN + 8 }> {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.status.code(), self.body);
        out
    }
}

impl From<ProtocolError> for ControlReply {
    fn from(error: ProtocolError) -> Self {
        let status = match error {
            ProtocolError::UnknownVerb => Status::NotFound,
            _ => Status::BadRequest,
        };
        Self::new(status, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_get_and_set() {
        assert_eq!(
            ControlRequest::parse("/brightness"),
            Ok(ControlRequest::Brightness { value: None })
        );
        assert_eq!(
            ControlRequest::parse("/brightness?value=255"),
            Ok(ControlRequest::Brightness { value: Some(255) })
        );
        assert!(ControlRequest::parse("/brightness").unwrap().is_query());
    }

    #[test]
    fn test_http_request_line() {
        let req = ControlRequest::parse("GET /scrollSpeed?value=24.5 HTTP/1.1").unwrap();
        assert_eq!(req, ControlRequest::ScrollSpeed { value: Some(24.5) });
        assert_eq!(req.path(), PATH_SCROLL_SPEED);
    }

    #[test]
    fn test_set_alert_optional_fields() {
        let req = ControlRequest::parse("/setAlert?text=fire+drill&color=FF0000&timeout=500")
            .unwrap();
        match req {
            ControlRequest::SetAlert {
                text,
                color,
                timeout_ms,
            } => {
                assert_eq!(text.as_str(), "fire drill");
                assert_eq!(color, Some(Rgb::RED));
                assert_eq!(timeout_ms, Some(500));
            }
            other => panic!("unexpected {:?}", other),
        }

        let req = ControlRequest::parse("/setAlert?text=hi").unwrap();
        assert!(matches!(
            req,
            ControlRequest::SetAlert {
                color: None,
                timeout_ms: None,
                ..
            }
        ));
    }

    #[test]
    fn test_set_alert_missing_text() {
        assert_eq!(
            ControlRequest::parse("/setAlert?timeout=500"),
            Err(ProtocolError::MissingArgument("text"))
        );
    }

    #[test]
    fn test_negative_timeout_rejected() {
        assert_eq!(
            ControlRequest::parse("/setAlert?text=x&timeout=-1"),
            Err(ProtocolError::InvalidArgument("timeout"))
        );
    }

    #[test]
    fn test_set_message() {
        let req = ControlRequest::parse("/setMessage?index=1&label=A&text=hello&color=FF0000")
            .unwrap();
        match req {
            ControlRequest::SetMessage {
                index,
                label,
                text,
                color,
            } => {
                assert_eq!(index, 1);
                assert_eq!(label.as_str(), "A");
                assert_eq!(text.as_str(), "hello");
                assert_eq!(color, Rgb::RED);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_set_message_missing_arguments() {
        assert_eq!(
            ControlRequest::parse("/setMessage?index=1&label=A&text=hello"),
            Err(ProtocolError::MissingArgument("color"))
        );
        assert_eq!(
            ControlRequest::parse("/clearMessage"),
            Err(ProtocolError::MissingArgument("index"))
        );
    }

    #[test]
    fn test_negative_index_is_decoded() {
        // Range checking belongs to the content store
        assert_eq!(
            ControlRequest::parse("/clearMessage?index=-1"),
            Ok(ControlRequest::ClearMessage { index: -1 })
        );
    }

    #[test]
    fn test_label_too_long() {
        assert_eq!(
            ControlRequest::parse(
                "/setMessage?index=0&label=abcdefghijklmnopq&text=x&color=FF0000"
            ),
            Err(ProtocolError::TooLong("label"))
        );
    }

    #[test]
    fn test_set_time() {
        assert_eq!(
            ControlRequest::parse("/setTime?epoch=1700000000"),
            Ok(ControlRequest::SetTime {
                epoch_s: 1_700_000_000
            })
        );
        assert_eq!(
            ControlRequest::parse("/setTime?epoch=-5"),
            Err(ProtocolError::InvalidArgument("epoch"))
        );
        assert_eq!(
            ControlRequest::parse("/setTime?epoch=4294967295"),
            Ok(ControlRequest::SetTime {
                epoch_s: MAX_EPOCH_S
            })
        );
        for epoch in ["4294967296", "9223372036854775807"] {
            let line = format!("/setTime?epoch={}", epoch);
            assert_eq!(
                ControlRequest::parse(&line),
                Err(ProtocolError::InvalidArgument("epoch"))
            );
        }
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert_eq!(
            ControlRequest::parse("/reboot"),
            Err(ProtocolError::UnknownVerb)
        );
        assert_eq!(
            ControlRequest::parse("brightness"),
            Err(ProtocolError::Malformed)
        );
        assert_eq!(ControlRequest::parse(""), Err(ProtocolError::Malformed));
    }

    #[test]
    fn test_reply_encoding() {
        assert_eq!(ControlReply::ok("Alert set").encode().as_str(), "200 Alert set\n");
        assert_eq!(ControlReply::ok(255).encode().as_str(), "200 255\n");
    }

    #[test]
    fn test_reply_from_error() {
        let reply = ControlReply::from(ProtocolError::MissingArgument("text"));
        assert_eq!(reply.status, Status::BadRequest);
        assert_eq!(reply.body.as_str(), "Missing arguments");

        let reply = ControlReply::from(ProtocolError::UnknownVerb);
        assert_eq!(reply.status.code(), 404);
        assert!(!reply.is_ok());
    }
}
