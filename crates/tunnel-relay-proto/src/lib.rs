// Copyright 2024-2026 Farlight Networks, LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Control protocol for tunnel-relay.
//!
//! This crate defines the messages exchanged on a relay control connection,
//! the length-prefixed framing they travel in, and the codec abstraction used
//! to serialize them.

mod codec;
mod error;
mod framing;
mod messages;

pub use codec::{BincodeCodec, Codec};
pub use error::{CodecError, WireError};
pub use framing::{FrameReader, FrameWriter, MAX_FRAME_SIZE};
pub use messages::{
    ControlMessage, Register, TunnelProtocol, VersionResponse, PROTOCOL_VERSION,
};
