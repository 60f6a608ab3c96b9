mod ids;
mod message;
mod track;

pub use ids::{ChannelId, TenantId, UserId};
pub use message::{Embed, OutgoingMessage};
pub use track::{Author, Requester, Thumbnail, Track, TrackMetadata};
