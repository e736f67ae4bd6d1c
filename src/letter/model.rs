use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The six personal details a letter is written from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LetterRequest {
    #[schema(example = "Jane Doe")]
    pub recipient_name: String,
    #[schema(example = "sparkling blue")]
    pub eye_color: String,
    #[schema(example = "spicy ramen")]
    pub favorite_food: String,
    #[schema(example = "the little cafe by the park")]
    pub favorite_place: String,
    #[schema(example = "Our first walk in the rain")]
    pub special_memory: String,
    #[schema(example = "John Doe")]
    pub sender_name: String,
}

impl LetterRequest {
    /// Value of a single field.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::RecipientName => &self.recipient_name,
            FormField::EyeColor => &self.eye_color,
            FormField::FavoriteFood => &self.favorite_food,
            FormField::FavoritePlace => &self.favorite_place,
            FormField::SpecialMemory => &self.special_memory,
            FormField::SenderName => &self.sender_name,
        }
    }

    /// Apply a partial update; absent fields keep their current value.
    pub fn apply(&mut self, update: UpdateFormRequest) {
        let UpdateFormRequest {
            recipient_name,
            eye_color,
            favorite_food,
            favorite_place,
            special_memory,
            sender_name,
        } = update;

        if let Some(value) = recipient_name {
            self.recipient_name = value;
        }
        if let Some(value) = eye_color {
            self.eye_color = value;
        }
        if let Some(value) = favorite_food {
            self.favorite_food = value;
        }
        if let Some(value) = favorite_place {
            self.favorite_place = value;
        }
        if let Some(value) = special_memory {
            self.special_memory = value;
        }
        if let Some(value) = sender_name {
            self.sender_name = value;
        }
    }
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormRequest {
    pub recipient_name: Option<String>,
    pub eye_color: Option<String>,
    pub favorite_food: Option<String>,
    pub favorite_place: Option<String>,
    pub special_memory: Option<String>,
    pub sender_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GeneratedLetterResponse {
    pub letter: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportLetterRequest {
    #[schema(example = "Jane Doe")]
    pub recipient_name: String,
    #[schema(example = "My Dearest Jane,\n\n...")]
    pub letter: String,
}

/// Form inputs, in the order they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    RecipientName,
    EyeColor,
    FavoriteFood,
    FavoritePlace,
    SpecialMemory,
    SenderName,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::RecipientName,
        FormField::EyeColor,
        FormField::FavoriteFood,
        FormField::FavoritePlace,
        FormField::SpecialMemory,
        FormField::SenderName,
    ];

    /// Wire name of the field, matching the JSON keys of [`LetterRequest`].
    pub fn id(self) -> &'static str {
        match self {
            FormField::RecipientName => "recipientName",
            FormField::EyeColor => "eyeColor",
            FormField::FavoriteFood => "favoriteFood",
            FormField::FavoritePlace => "favoritePlace",
            FormField::SpecialMemory => "specialMemory",
            FormField::SenderName => "senderName",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::RecipientName => "Their Name",
            FormField::EyeColor => "Their Eye Color",
            FormField::FavoriteFood => "Their Favorite Food",
            FormField::FavoritePlace => "A Place They Love",
            FormField::SpecialMemory => "A Special Memory You Share",
            FormField::SenderName => "Your Name",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::RecipientName => "e.g., Jane Doe",
            FormField::EyeColor => "e.g., sparkling blue",
            FormField::FavoriteFood => "e.g., spicy ramen",
            FormField::FavoritePlace => "e.g., the little cafe by the park",
            FormField::SpecialMemory => "Describe a cherished moment...",
            FormField::SenderName => "e.g., John Doe",
        }
    }

    /// Only the shared memory is a multi-line input.
    pub fn multiline(self) -> bool {
        matches!(self, FormField::SpecialMemory)
    }

    pub fn descriptor(self) -> FormFieldDescriptor {
        FormFieldDescriptor {
            id: self.id().to_string(),
            label: self.label().to_string(),
            placeholder: self.placeholder().to_string(),
            multiline: self.multiline(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct FormFieldDescriptor {
    #[schema(example = "recipientName")]
    pub id: String,
    #[schema(example = "Their Name")]
    pub label: String,
    #[schema(example = "e.g., Jane Doe")]
    pub placeholder: String,
    pub multiline: bool,
}
