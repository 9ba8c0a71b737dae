//! Canonical phrase tables, one per trigger category.
//!
//! Phrases are lowercase and matched as whole-word sequences against
//! [`NormalizedText`](super::normalize::NormalizedText). Entries ending in
//! `_STRIPPED` are matched as substrings of the whitespace-stripped text.

/// Help keywords, matched against adjacent whole words joined without
/// spaces ("gpt help", "klein bot help").
pub const HELP_KEYWORDS: &[&str] = &["gpthelp", "kleinhelp", "kleinbothelp"];

/// Most words a help keyword may be split across.
pub const HELP_KEYWORD_MAX_WORDS: usize = 3;

/// Messages that are nothing but a help request.
pub const HELP_EXACT: &[&str] = &["help", "commands"];

/// First-person claims to be the creator (English + Tagalog).
pub const CREATOR_CLAIMS: &[&str] = &[
    "i am the creator",
    "i'm the creator",
    "im the creator",
    "i am your creator",
    "i'm your creator",
    "im your creator",
    "i am your maker",
    "i'm your maker",
    "i made you",
    "i created you",
    "i built you",
    "i coded you",
    "i am klein dindin",
    "i'm klein dindin",
    "im klein dindin",
    "i am kleindindin",
    "i'm kleindindin",
    "i am klein",
    "i'm klein",
    "im klein",
    "ako si klein",
    "ako gumawa sayo",
    "ako gumawa sa'yo",
    "ako ang gumawa sayo",
    "ako ang gumawa sa'yo",
    "ako yung gumawa sayo",
];

/// A claim counts when it starts within this many leading words...
pub const CREATOR_CLAIM_MAX_OFFSET: usize = 2;
/// ...or the whole message is at most this many words.
pub const CREATOR_CLAIM_SHORT_MESSAGE: usize = 8;

/// Third-person references to the creator.
pub const CREATOR_ALIASES: &[&str] = &["klein dindin", "kleindindin", "dindin"];

/// References to the bot itself, matched against the stripped text.
pub const BOT_ALIASES_STRIPPED: &[&str] = &["kleinbot"];

/// The bare first name shared by bot and creator.
pub const AMBIGUOUS_NAME: &str = "klein";

/// Explicit terms refused outright, matched as whole words.
pub const DENYLIST: &[&str] = &[
    "porn", "sex", "nude", "nudes", "naked", "hentai", "xxx", "nsfw", "adult", "69", "pussy",
    "cock", "blowjob", "anal",
];

/// Terms refused even inside longer words ("pornhub", "xxxvideos").
pub const DENYLIST_STRIPPED: &[&str] = &["porn", "hentai", "nsfw", "xxx", "blowjob"];

/// Comfort-seeking phrases (Tagalog + English).
pub const COMFORT: &[&str] = &[
    "palambing",
    "palambingin",
    "pwede palambing",
    "need lambing",
    "lambing",
    "lamigin",
    "comfort me",
    "comfort",
    "can you comfort",
    "need comfort",
    "sad ako",
    "i'm sad",
    "im sad",
    "i am sad",
];

/// Roast request.
pub const ROAST: &[&str] = &["roast me"];

/// Attribution questions.
pub const WHO_MADE_YOU: &[&str] = &[
    "who made you",
    "who make you",
    "who created you",
    "who built you",
    "who is your creator",
    "who's your creator",
    "sino gumawa sayo",
    "sino gumawa sa'yo",
    "sino ang gumawa sayo",
    "sino ang gumawa sa'yo",
    "gumawa sayo",
    "gumawa sa'yo",
];
