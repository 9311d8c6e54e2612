use super::Quote;

const BUILTIN: &[(&str, &str)] = &[
    ("The secret of getting ahead is getting started.", "Mark Twain"),
    ("It does not matter how slowly you go as long as you do not stop.", "Confucius"),
    ("Well begun is half done.", "Aristotle"),
    ("What we achieve inwardly will change outer reality.", "Plutarch"),
    ("The mind is everything. What you think you become.", "Buddha"),
    ("Nothing is particularly hard if you divide it into small jobs.", "Henry Ford"),
    ("Quality is not an act, it is a habit.", "Aristotle"),
    ("Do what you can, with what you have, where you are.", "Theodore Roosevelt"),
    ("Simplicity is the ultimate sophistication.", "Leonardo da Vinci"),
    ("He who has a why to live can bear almost any how.", "Friedrich Nietzsche"),
    ("Energy and persistence conquer all things.", "Benjamin Franklin"),
    ("Adopt the pace of nature: her secret is patience.", "Ralph Waldo Emerson"),
    ("Rest when you're weary. Refresh and renew yourself.", "Ralph Marston"),
    ("You must do the thing you think you cannot do.", "Eleanor Roosevelt"),
    ("The best way out is always through.", "Robert Frost"),
];

/// The quote pool shipped with the app.
pub fn builtin_quotes() -> Vec<Quote> {
    BUILTIN
        .iter()
        .map(|(text, author)| Quote::new(*text, *author))
        .collect()
}
