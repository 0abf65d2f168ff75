use std::io::{self, BufRead, Write};

use crate::command::{self, Context, Reply};
use crate::player::Player;
use crate::playlist::{self, SharedPlaylist};

/// Answer command lines from `input` until it ends or the client sends
/// `close`.
pub fn serve<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    playlist: &SharedPlaylist,
    player: &Player,
) -> io::Result<()> {
    writeln!(output, "OK ostinato {}", env!("CARGO_PKG_VERSION"))?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let playback = player.playback();
        let (reply, playback_changed) = {
            let mut guard = playlist::lock(playlist);
            let before = (guard.song_generation(), guard.state());
            let reply = command::respond(&line, &mut guard, &Context { playback: &playback });
            (reply, before != (guard.song_generation(), guard.state()))
        };
        if playback_changed {
            player.refresh();
        }

        match reply {
            Reply::Ok(response) => {
                for l in response.lines() {
                    writeln!(output, "{l}")?;
                }
                writeln!(output, "OK")?;
            }
            Reply::Ack(ack) => writeln!(output, "{ack}")?,
            Reply::Close => break,
        }
        output.flush()?;
    }

    debug!("console closed");
    Ok(())
}
