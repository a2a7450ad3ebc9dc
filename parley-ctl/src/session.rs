use parley_client::{api::CommentId, Comment, SyncClient, ThreadStore};

const HELP: &str = "\
show                 print the thread
post <text>          post a root comment
reply <id> <text>    reply to a comment
like <id>            like a comment
reload               fetch the thread again
quit                 leave
";

#[derive(Debug, Eq, PartialEq)]
pub enum Command {
    Show,
    Post(String),
    Reply(CommentId, String),
    Like(CommentId),
    Reload,
    Help,
    Quit,
}

impl Command {
    /// Ok(None) for blank lines
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        Ok(Some(match word {
            "show" => Command::Show,
            "post" => Command::Post(String::from(rest)),
            "reply" => {
                let (id, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or("usage: reply <id> <text>")?;
                Command::Reply(CommentId::new(id), String::from(text.trim()))
            }
            "like" if !rest.is_empty() => Command::Like(CommentId::new(rest)),
            "like" => return Err(String::from("usage: like <id>")),
            "reload" => Command::Reload,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command {other:?}, try help")),
        }))
    }
}

/// Returns false once the session should end
pub async fn execute<S: SyncClient>(
    store: &mut ThreadStore<S>,
    author: &str,
    cmd: Command,
) -> bool {
    let res = match cmd {
        Command::Show => Ok(()),
        Command::Post(text) => store.post_root(&text, author).await.map(|_| ()),
        Command::Reply(id, text) => store.post_reply(&id, &text, author).await.map(|_| ()),
        Command::Like(id) => store.like(&id),
        Command::Reload => {
            let thread = store.thread_id().clone();
            store.load(thread).await
        }
        Command::Help => {
            print!("{HELP}");
            return true;
        }
        Command::Quit => return false,
    };
    match res {
        Ok(()) => print!("{}", render(store)),
        Err(e) => eprintln!("error: {e}"),
    }
    true
}

pub fn render<S: SyncClient>(store: &ThreadStore<S>) -> String {
    let quota = store.quota();
    let mut out = format!(
        "thread {} ({}/{} root comments left)\n",
        store.thread_id(),
        quota.remaining(),
        quota.max(),
    );
    for c in store.roots() {
        render_comment(&mut out, store, c);
    }
    out
}

fn render_comment<S: SyncClient>(out: &mut String, store: &ThreadStore<S>, c: &Comment) {
    let indent = "    ".repeat(c.depth);
    out.push_str(&format!(
        "{indent}[{}] ({}) {} at {}, {} like(s)\n",
        c.id,
        c.avatar(),
        c.author,
        c.timestamp,
        c.likes,
    ));
    for line in c.content.lines() {
        out.push_str(&format!("{indent}  {line}\n"));
    }
    for reply in store.replies(&c.id) {
        render_comment(out, store, reply);
    }
}
