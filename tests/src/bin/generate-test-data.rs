use chrono::{Duration, Utc};
use parley_api::{avatar_glyph, format_timestamp, Comment, CommentId, Time, Uuid};
use rand::Rng;

const AUTHORS: [&str; 5] = ["ana", "bo", "cyril", "dana", "eve"];

const NUM_ROOTS: usize = 3;
const MAX_REPLIES: usize = 3;
const MAX_DEPTH: usize = 2;
const COMMENT_WORD_COUNT: usize = 20;

fn gen_comment(rng: &mut impl Rng, now: Time, depth: usize) -> Comment {
    let author = AUTHORS[rng.gen_range(0..AUTHORS.len())];
    let timestamp = now - Duration::minutes(rng.gen_range(0..60 * 24 * 7));
    let num_replies = match depth < MAX_DEPTH {
        true => rng.gen_range(0..=MAX_REPLIES),
        false => 0,
    };
    Comment {
        id: CommentId::new(Uuid::new_v4().to_string()),
        author: String::from(author),
        avatar: avatar_glyph(author),
        content: lipsum::lipsum_words(rng.gen_range(1..=COMMENT_WORD_COUNT)),
        timestamp: format_timestamp(&timestamp),
        likes: rng.gen_range(0..10),
        replies: (0..num_replies)
            .map(|_| gen_comment(rng, now, depth + 1))
            .collect(),
        thread_id: None,
        parent_id: None,
    }
}

/// Prints a nested thread, usable as `parley-ctl --offline --seed`
fn main() {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let thread = (0..NUM_ROOTS)
        .map(|_| gen_comment(&mut rng, now, 0))
        .collect::<Vec<_>>();
    println!(
        "{}",
        serde_json::to_string_pretty(&thread).expect("serializing test data")
    );
}
