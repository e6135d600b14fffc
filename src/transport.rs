use std::io;
use std::io::Write;
use std::num::NonZeroU32;

use thiserror::Error;
use tracing::warn;

/// A channel for diagnostic text.
///
/// A send is done once [`Transport::send`] returns `Ok(true)`. `Ok(false)` means the channel is
/// busy and the same bytes have to be offered again, see [`send_blocking`]. A busy send may
/// already have taken a prefix of `buf`; the transport keeps track of it, so the retry must
/// pass the very same bytes. An error means the channel is gone and retrying won't help.
pub trait Transport {
    /// Try to send `buf` once. Returns `true` when all of it was accepted.
    fn send(&mut self, buf: &[u8]) -> Result<bool, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, buf: &[u8]) -> Result<bool, TransportError> {
        (**self).send(buf)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, buf: &[u8]) -> Result<bool, TransportError> {
        (**self).send(buf)
    }
}

/// How many times a refused send is tried again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Spin until the transport takes the bytes. Only a broken transport ends the wait.
    Unbounded,

    /// Give up after this many attempts
    Bounded(NonZeroU32),
}

impl RetryPolicy {
    /// Give up after `attempts` attempts. Zero is treated as a single attempt.
    pub fn bounded(attempts: u32) -> Self {
        Self::Bounded(NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Transport refused {len} bytes after {attempts} attempts")]
    RetriesExhausted { len: usize, attempts: u32 },

    #[error("Transport failed: {0}")]
    Io(#[from] io::Error),
}

/// Send `buf`, polling the transport until it accepts it.
pub fn send_blocking<T>(
    transport: &mut T,
    buf: &[u8],
    policy: RetryPolicy,
) -> Result<(), TransportError>
where
    T: Transport + ?Sized,
{
    let mut attempts: u32 = 0;

    loop {
        attempts = attempts.saturating_add(1);

        if transport.send(buf)? {
            return Ok(());
        }

        match policy {
            RetryPolicy::Unbounded => {
                if attempts == 1 {
                    warn!(len = buf.len(), "Transport busy, retrying until it accepts");
                }
            }
            RetryPolicy::Bounded(max) => {
                if attempts >= max.get() {
                    return Err(TransportError::RetriesExhausted {
                        len: buf.len(),
                        attempts,
                    });
                }

                warn!(attempts, max = max.get(), "Transport refused send");
            }
        }

        std::hint::spin_loop();
    }
}

/// Sends through anything implementing [`io::Write`], such as stdout or stderr.
///
/// The writer is busy when it reports `WouldBlock` or `Interrupted`. Bytes written before that
/// are remembered and the next send resumes after them. Any other I/O error is fatal.
pub struct WriteTransport<W> {
    writer: W,

    /// Bytes of the pending buffer already written
    written: usize,
}

impl<W: Write> WriteTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_rest(&mut self, buf: &[u8]) -> io::Result<()> {
        while self.written < buf.len() {
            match self.writer.write(&buf[self.written..])? {
                0 => return Err(io::ErrorKind::WriteZero.into()),
                n => self.written += n,
            }
        }

        self.writer.flush()
    }
}

impl<W: Write> Transport for WriteTransport<W> {
    fn send(&mut self, buf: &[u8]) -> Result<bool, TransportError> {
        match self.write_rest(buf) {
            Ok(()) => {
                self.written = 0;
                Ok(true)
            }
            Err(e) if is_busy(&e) => Ok(false),
            Err(e) => {
                self.written = 0;
                Err(e.into())
            }
        }
    }
}

fn is_busy(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Collects everything sent into memory.
///
/// It can be told to refuse a number of sends first, which is how a busy transport looks from
/// the outside.
#[derive(Debug, Default, Clone)]
pub struct BufferTransport {
    buf: Vec<u8>,

    /// Sends left to refuse
    busy: u32,

    /// Total number of calls to `send`
    attempts: u32,
}

impl BufferTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the next `busy` sends
    pub fn busy_for(mut self, busy: u32) -> Self {
        self.busy = busy;
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Everything sent so far, lossily decoded as UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    /// Hand over everything sent so far, leaving the buffer empty
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Transport for BufferTransport {
    fn send(&mut self, buf: &[u8]) -> Result<bool, TransportError> {
        self.attempts += 1;

        if self.busy > 0 {
            self.busy -= 1;
            return Ok(false);
        }

        self.buf.extend_from_slice(buf);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Takes `chunk` bytes, then reports `WouldBlock` once, then starts over
    struct Choppy {
        out: Vec<u8>,
        chunk: usize,
        blocked: bool,
    }

    impl Write for Choppy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.blocked {
                self.blocked = false;
                return Err(io::ErrorKind::WouldBlock.into());
            }

            self.blocked = true;

            let n = buf.len().min(self.chunk);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unbounded_waits_out_busy_transport() {
        let mut transport = BufferTransport::new().busy_for(25);

        send_blocking(&mut transport, b"Done\n", RetryPolicy::Unbounded).unwrap();

        assert_eq!(transport.text(), "Done\n");
        assert_eq!(transport.attempts(), 26);
    }

    #[test]
    fn test_bounded_gives_up() {
        let mut transport = BufferTransport::new().busy_for(10);

        let res = send_blocking(&mut transport, b"Done\n", RetryPolicy::bounded(3));

        assert!(matches!(
            res,
            Err(TransportError::RetriesExhausted {
                len: 5,
                attempts: 3
            })
        ));
        assert_eq!(transport.attempts(), 3);
        assert!(transport.as_bytes().is_empty());
    }

    #[test]
    fn test_bounded_zero_is_one_attempt() {
        assert_eq!(RetryPolicy::bounded(0), RetryPolicy::bounded(1));
    }

    #[test]
    fn test_write_transport() -> anyhow::Result<()> {
        let mut transport = WriteTransport::new(Vec::new());

        assert!(transport.send(b"Starting up\n")?);
        assert_eq!(transport.into_inner(), b"Starting up\n");

        Ok(())
    }

    #[test]
    fn test_partial_write_resumes() -> anyhow::Result<()> {
        let writer = Choppy {
            out: Vec::new(),
            chunk: 3,
            blocked: false,
        };
        let mut transport = WriteTransport::new(writer);

        send_blocking(&mut transport, b"Done\n", RetryPolicy::Unbounded)?;
        send_blocking(&mut transport, b"Entering loop\n", RetryPolicy::Unbounded)?;

        assert_eq!(transport.into_inner().out, b"Done\nEntering loop\n");

        Ok(())
    }

    #[test]
    fn test_broken_writer_is_fatal() {
        let mut transport = WriteTransport::new(Broken);

        let res = send_blocking(&mut transport, b"Done\n", RetryPolicy::Unbounded);

        assert!(matches!(
            res,
            Err(TransportError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe
        ));
    }

    #[test]
    fn test_take() {
        let mut transport = BufferTransport::new();
        transport.send(b"Done\n").unwrap();

        assert_eq!(transport.take(), b"Done\n");
        assert!(transport.as_bytes().is_empty());
    }
}
