use crate::stemmer::stem;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Tokens this short or shorter are never indexed.
pub const MIN_TOKEN_CHARS: usize = 3;

lazy_static! {
    // ASCII word chars, whitespace and the Latin accented letters are kept; everything else splits.
    static ref SEPARATORS: Regex =
        Regex::new(r"[^0-9a-z_\sàáâãäåæçèéêëìíîïñòóôõöøùúûüýÿ]").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let english: &[&str] = &[
            "a","about","above","after","again","against","all","also","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","could","did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself","just",
            "me","more","most","my","myself",
            "no","nor","not","now","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","will","with","would",
            "you","your","yours","yourself","yourselves",
        ];
        let portuguese: &[&str] = &[
            "a","ao","aos","aquela","aquelas","aquele","aqueles","aquilo","as","até",
            "com","como","da","das","de","dela","delas","dele","deles","depois","do","dos",
            "e","ela","elas","ele","eles","em","entre","era","eram","essa","essas","esse","esses","esta","estas","este","estes","eu",
            "foi","foram","há","isso","isto","já","lhe","lhes","mais","mas","me","mesmo","meu","minha",
            "muito","na","nas","nem","no","nos","nós","num","numa","não",
            "o","os","ou","para","pela","pelas","pelo","pelos","por","qual","quando","que","quem",
            "se","sem","ser","seu","seus","sua","suas","são","só","também","te","tem","têm","tu","tua",
            "um","uma","umas","uns","você","vocês","vos","à","às","é","está","estão",
        ];
        english.iter().chain(portuguese.iter()).copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Split text into lowercase tokens, dropping stop words and tokens of two characters or fewer.
///
/// Input is NFC-normalized first so decomposed accents compare equal to their
/// precomposed forms.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let normalized = text.nfc().collect::<String>().to_lowercase();
    let cleaned = SEPARATORS.replace_all(&normalized, " ");
    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS && !is_stopword(token))
        .map(str::to_owned)
        .collect()
}

/// Tokenize and stem. Indexing and querying both go through here so their terms line up.
pub fn analyze(text: &str) -> Vec<String> {
    tokenize(text).iter().map(|token| stem(token)).collect()
}
