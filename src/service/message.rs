//! Control messages
//!
//! Messages a client sends to the broadcast service. Raw messages carry the
//! numeric `what` codes used on the client side; [`ControlMessage::from_raw`]
//! maps them onto the typed variants.

use crate::registry::{ClientHandle, ClientId};

/// Code of a register message
pub const MSG_REGISTER_CLIENT: i32 = 1;
/// Code of an unregister message
pub const MSG_UNREGISTER_CLIENT: i32 = 2;
/// Code of a set-increment message (and of integer updates)
pub const MSG_SET_INT_VALUE: i32 = 3;
/// Code of string updates (service to client only)
pub const MSG_SET_STRING_VALUE: i32 = 4;

/// Untyped control message as sent by a client
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// Message code
    pub what: i32,
    /// Integer argument
    pub arg: i64,
    /// Handle of the sending client, if any
    pub reply_to: Option<ClientHandle>,
}

impl RawMessage {
    /// Create a raw message without a reply handle
    pub fn new(what: i32, arg: i64) -> Self {
        Self {
            what,
            arg,
            reply_to: None,
        }
    }

    /// Attach the sender's handle
    pub fn reply_to(mut self, handle: ClientHandle) -> Self {
        self.reply_to = Some(handle);
        self
    }
}

/// Control message handled by the broadcast service
#[derive(Debug, Clone)]
pub enum ControlMessage {
    /// Subscribe a client
    Register(ClientHandle),
    /// Remove a client
    Unregister(ClientId),
    /// Replace the increment step (not validated)
    SetIncrement(i64),
    /// Unrecognized or malformed message, carrying its code
    Unknown(i32),
}

impl ControlMessage {
    /// Decode a raw message
    ///
    /// A register without a reply handle is malformed and decodes to
    /// `Unknown`. Unregister identifies the client by its reply handle, or by
    /// `arg` when no handle is attached.
    pub fn from_raw(raw: RawMessage) -> Self {
        match raw.what {
            MSG_REGISTER_CLIENT => match raw.reply_to {
                Some(handle) => ControlMessage::Register(handle),
                None => ControlMessage::Unknown(raw.what),
            },
            MSG_UNREGISTER_CLIENT => match raw.reply_to {
                Some(handle) => ControlMessage::Unregister(handle.id()),
                None if raw.arg >= 0 => ControlMessage::Unregister(ClientId::new(raw.arg as u64)),
                None => ControlMessage::Unknown(raw.what),
            },
            MSG_SET_INT_VALUE => ControlMessage::SetIncrement(raw.arg),
            other => ControlMessage::Unknown(other),
        }
    }

    /// Short name of the message kind
    pub fn kind(&self) -> &'static str {
        match self {
            ControlMessage::Register(_) => "register",
            ControlMessage::Unregister(_) => "unregister",
            ControlMessage::SetIncrement(_) => "set_increment",
            ControlMessage::Unknown(_) => "unknown",
        }
    }
}

impl From<RawMessage> for ControlMessage {
    fn from(raw: RawMessage) -> Self {
        Self::from_raw(raw)
    }
}
