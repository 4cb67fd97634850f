use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use zeroize::Zeroizing;

/// Where a command reads the mind passphrase from
#[derive(Args, Debug, Clone, Default)]
pub struct PassphraseArgs {
    /// Passphrase of the mind (read from stdin if not given)
    #[arg(long, env = "MIND_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PassphraseError {
    #[error("no passphrase given on the command line, in MIND_PASSPHRASE or on stdin")]
    Missing,
    #[error("failed to read passphrase: {0}")]
    Io(#[from] std::io::Error),
}

impl PassphraseArgs {
    /// Resolve the passphrase, falling back to one line of stdin
    pub async fn read(&self) -> Result<Zeroizing<String>, PassphraseError> {
        match &self.passphrase {
            Some(passphrase) => Ok(Zeroizing::new(passphrase.clone())),
            None => read_line(BufReader::new(tokio::io::stdin())).await,
        }
    }
}

async fn read_line<R>(mut reader: R) -> Result<Zeroizing<String>, PassphraseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Zeroizing::new(String::new());
    if reader.read_line(&mut line).await? == 0 {
        return Err(PassphraseError::Missing);
    }
    let trimmed = line.trim_end_matches(&['\r', '\n'][..]).len();
    line.truncate(trimmed);
    Ok(line)
}
