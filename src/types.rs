// Domain records mirrored from API responses. Every field tolerates being
// absent or `null` on the wire, so partial objects (as returned by join) and
// system messages without an avatar still decode.

use serde::{Deserialize, Deserializer, Serialize};

use crate::time::UnixTime;

/// A group the authenticated user belongs to (or once did).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creator_user_id: String,
    pub created_at: Option<UnixTime>,
    pub updated_at: Option<UnixTime>,
    #[serde(deserialize_with = "null_as_default")]
    pub members: Vec<Member>,
    #[serde(deserialize_with = "null_as_default")]
    pub share_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub messages: Messages,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub muted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Client-assigned idempotency token.
    #[serde(deserialize_with = "null_as_default")]
    pub source_guid: String,
    pub created_at: Option<UnixTime>,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub system: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub favorited_by: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

/// Message summary embedded in a [`Group`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_message_id: String,
    pub last_message_created_at: Option<UnixTime>,
    #[serde(deserialize_with = "null_as_default")]
    pub preview: Preview,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preview {
    #[serde(deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

/// Decode `null` the same as a missing field: the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `[pack_id, offset]` into an emoji pack.
pub type Charmap = [u64; 2];

/// `[start, length]` of a mention inside the message text.
pub type Locus = [u64; 2];

/// Message attachment, selected by the wire `type` field.
///
/// Tags this crate does not know are kept as [`Attachment::Unknown`] so the
/// message still decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAttachment", into = "RawAttachment")]
pub enum Attachment {
    Image {
        url: String,
    },
    Location {
        lat: String,
        lng: String,
        name: String,
    },
    Mentions {
        loci: Vec<Locus>,
        user_ids: Vec<String>,
    },
    Split {
        token: String,
    },
    Emoji {
        placeholder: String,
        charmap: Vec<Charmap>,
    },
    Unknown {
        kind: String,
    },
}

impl Attachment {
    /// The wire discriminator.
    pub fn kind(&self) -> &str {
        match self {
            Attachment::Image { .. } => "image",
            Attachment::Location { .. } => "location",
            Attachment::Mentions { .. } => "mentions",
            Attachment::Split { .. } => "split",
            Attachment::Emoji { .. } => "emoji",
            Attachment::Unknown { kind } => kind,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Attachment::Image { .. })
    }

    pub fn is_location(&self) -> bool {
        matches!(self, Attachment::Location { .. })
    }

    pub fn is_mentions(&self) -> bool {
        matches!(self, Attachment::Mentions { .. })
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Attachment::Split { .. })
    }

    pub fn is_emoji(&self) -> bool {
        matches!(self, Attachment::Emoji { .. })
    }
}

// Flat wire shape. Only the fields of the active variant are present.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawAttachment {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lng: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loci: Option<Vec<Locus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    charmap: Option<Vec<Charmap>>,
}

impl From<RawAttachment> for Attachment {
    fn from(raw: RawAttachment) -> Self {
        match raw.kind.as_str() {
            "image" => Attachment::Image {
                url: raw.url.unwrap_or_default(),
            },
            "location" => Attachment::Location {
                lat: raw.lat.unwrap_or_default(),
                lng: raw.lng.unwrap_or_default(),
                name: raw.name.unwrap_or_default(),
            },
            "mentions" => Attachment::Mentions {
                loci: raw.loci.unwrap_or_default(),
                user_ids: raw.user_ids.unwrap_or_default(),
            },
            "split" => Attachment::Split {
                token: raw.token.unwrap_or_default(),
            },
            "emoji" => Attachment::Emoji {
                placeholder: raw.placeholder.unwrap_or_default(),
                charmap: raw.charmap.unwrap_or_default(),
            },
            _ => Attachment::Unknown { kind: raw.kind },
        }
    }
}

impl From<Attachment> for RawAttachment {
    fn from(attachment: Attachment) -> Self {
        let kind = attachment.kind().to_string();
        match attachment {
            Attachment::Image { url } => RawAttachment {
                kind,
                url: Some(url),
                ..Default::default()
            },
            Attachment::Location { lat, lng, name } => RawAttachment {
                kind,
                lat: Some(lat),
                lng: Some(lng),
                name: Some(name),
                ..Default::default()
            },
            Attachment::Mentions { loci, user_ids } => RawAttachment {
                kind,
                loci: Some(loci),
                user_ids: Some(user_ids),
                ..Default::default()
            },
            Attachment::Split { token } => RawAttachment {
                kind,
                token: Some(token),
                ..Default::default()
            },
            Attachment::Emoji {
                placeholder,
                charmap,
            } => RawAttachment {
                kind,
                placeholder: Some(placeholder),
                charmap: Some(charmap),
                ..Default::default()
            },
            Attachment::Unknown { .. } => RawAttachment {
                kind,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn predicates(a: &Attachment) -> [bool; 5] {
        [
            a.is_image(),
            a.is_location(),
            a.is_mentions(),
            a.is_split(),
            a.is_emoji(),
        ]
    }

    #[test]
    fn each_tag_sets_exactly_one_predicate() {
        let cases = [
            (json!({"type": "image", "url": "https://i.groupme.com/x"}), 0),
            (json!({"type": "location", "lat": "40.7", "lng": "-74.0", "name": "NYC"}), 1),
            (json!({"type": "mentions", "loci": [[0, 5]], "user_ids": ["u1"]}), 2),
            (json!({"type": "split", "token": "tok"}), 3),
            (json!({"type": "emoji", "placeholder": "?", "charmap": [[1, 42]]}), 4),
        ];
        for (wire, idx) in cases {
            let a: Attachment = serde_json::from_value(wire).unwrap();
            let mut expected = [false; 5];
            expected[idx] = true;
            assert_eq!(predicates(&a), expected, "{a:?}");
        }
    }

    #[test]
    fn unknown_tag_sets_no_predicate() {
        let a: Attachment = serde_json::from_value(json!({"type": "poll", "poll_id": "9"})).unwrap();
        assert_eq!(predicates(&a), [false; 5]);
        assert_eq!(a.kind(), "poll");
    }

    #[test]
    fn variant_payloads_decode() {
        let a: Attachment = serde_json::from_value(json!({
            "type": "mentions",
            "loci": [[0, 4], [10, 6]],
            "user_ids": ["u1", "u2"]
        }))
        .unwrap();
        assert_eq!(
            a,
            Attachment::Mentions {
                loci: vec![[0, 4], [10, 6]],
                user_ids: vec!["u1".into(), "u2".into()],
            }
        );
    }

    #[test]
    fn inactive_fields_are_absent_when_encoded() {
        let v: Value = serde_json::to_value(Attachment::Split { token: "t".into() }).unwrap();
        assert_eq!(v, json!({"type": "split", "token": "t"}));

        let v: Value = serde_json::to_value(Attachment::Image { url: "u".into() }).unwrap();
        assert_eq!(v, json!({"type": "image", "url": "u"}));
    }

    #[test]
    fn message_decodes_with_missing_fields() {
        let m: Message = serde_json::from_value(json!({
            "id": "m1",
            "created_at": 1519905600,
            "favorited_by": ["u2", "u1"],
            "attachments": [{"type": "image", "url": "x"}]
        }))
        .unwrap();
        assert_eq!(m.id, "m1");
        assert_eq!(m.created_at.map(|t| t.secs()), Some(1_519_905_600));
        assert_eq!(m.favorited_by, vec!["u2", "u1"]);
        assert!(m.attachments[0].is_image());
        assert!(m.text.is_empty());
        assert!(!m.system);
    }

    #[test]
    fn null_fields_decode_as_defaults() {
        let m: Message = serde_json::from_value(json!({
            "id": "m1",
            "name": "GroupMe",
            "avatar_url": null,
            "text": null,
            "system": null,
            "favorited_by": null,
            "attachments": null,
            "created_at": null
        }))
        .unwrap();
        assert_eq!(m.id, "m1");
        assert!(m.avatar_url.is_empty());
        assert!(m.text.is_empty());
        assert!(!m.system);
        assert!(m.favorited_by.is_empty());
        assert!(m.attachments.is_empty());
        assert!(m.created_at.is_none());

        let g: Group = serde_json::from_value(json!({
            "id": "g1",
            "description": null,
            "image_url": null,
            "members": [{"user_id": "u1", "image_url": null, "muted": null}],
            "messages": {"count": null, "preview": {"image_url": null, "attachments": null}}
        }))
        .unwrap();
        assert!(g.description.is_empty());
        assert!(g.image_url.is_empty());
        assert!(g.members[0].image_url.is_empty());
        assert_eq!(g.messages.count, 0);
    }

    #[test]
    fn group_type_field_is_renamed() {
        let g: Group = serde_json::from_value(json!({
            "id": "g1",
            "type": "private",
            "members": [{"user_id": "u1", "nickname": "Al", "muted": true}],
            "messages": {"count": 3, "last_message_id": "m3", "preview": {"nickname": "Al"}}
        }))
        .unwrap();
        assert_eq!(g.kind, "private");
        assert!(g.members[0].muted);
        assert_eq!(g.messages.count, 3);
        assert_eq!(g.messages.preview.nickname, "Al");
        assert!(g.created_at.is_none());
    }
}
