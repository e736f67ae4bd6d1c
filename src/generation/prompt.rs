use crate::letter::model::LetterRequest;

/// Render the letter-writing instructions for `request`.
///
/// Each field is interpolated exactly once and as-is; the model is told to
/// reuse the names in the salutation and signature rather than being given
/// them a second time.
pub fn build_prompt(request: &LetterRequest) -> String {
    let LetterRequest {
        recipient_name,
        eye_color,
        favorite_food,
        favorite_place,
        special_memory,
        sender_name,
    } = request;

    format!(
        r#"You are a world-renowned romantic poet with a gift for writing deeply personal and moving love letters. Your task is to write a beautiful love letter from {sender_name} to {recipient_name}.

Incorporate the following personal details to make the letter unique and heartfelt:

- Their eye color is {eye_color}.
- Their favorite food is {favorite_food}.
- They love spending time at {favorite_place}.
- A special memory we share is: "{special_memory}".

Please craft a letter that flows poetically, expressing deep affection and admiration. The tone should be romantic, sincere, and slightly whimsical. The letter should be approximately 200-300 words long.

Do not include a subject line or any introductory text like "Here is the love letter:".

Just provide the pure text of the letter, starting with a salutation like "My Dearest" followed by the recipient's name and a comma, and ending with a closing like "Yours forever and always," or something similarly romantic, followed by the sender's name."#
    )
}
