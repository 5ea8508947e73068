//! Raw byte input from the controlling terminal.
//!
//! Reads go straight to the file descriptor: a buffered reader would hide the
//! tail of an escape sequence from `poll`.

use std::{
  io,
  time::Duration,
};

use kite_lib::input::ByteSource;

#[cfg(unix)]
pub struct TtyInput {
  fd:             libc::c_int,
  escape_timeout: Duration,
}

#[cfg(unix)]
impl TtyInput {
  pub fn stdin(escape_timeout: Duration) -> Self {
    Self {
      fd: libc::STDIN_FILENO,
      escape_timeout,
    }
  }

  fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
    let mut pollfd = libc::pollfd {
      fd:      self.fd,
      events:  libc::POLLIN,
      revents: 0,
    };
    let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
    loop {
      // SAFETY: `pollfd` is a valid pollfd for the duration of the call.
      let ready = unsafe { libc::poll(&mut pollfd, 1, millis) };
      if ready >= 0 {
        return Ok(ready > 0);
      }
      let err = io::Error::last_os_error();
      if err.kind() != io::ErrorKind::Interrupted {
        return Err(err);
      }
    }
  }

  fn read_into(&self, buf: &mut [u8]) -> io::Result<usize> {
    loop {
      // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
      let read = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), buf.len()) };
      if read >= 0 {
        return Ok(read as usize);
      }
      let err = io::Error::last_os_error();
      if err.kind() != io::ErrorKind::Interrupted {
        return Err(err);
      }
    }
  }
}

#[cfg(unix)]
impl ByteSource for TtyInput {
  fn read_byte(&mut self) -> io::Result<u8> {
    let mut byte = [0u8; 1];
    match self.read_into(&mut byte)? {
      0 => Err(io::ErrorKind::UnexpectedEof.into()),
      _ => Ok(byte[0]),
    }
  }

  fn read_pending(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() && self.wait_readable(self.escape_timeout)? {
      match self.read_into(&mut buf[filled..])? {
        0 => break,
        read => filled += read,
      }
    }
    Ok(filled)
  }
}

#[cfg(any(not(unix), test))]
use std::{
  io::Read as _,
  sync::mpsc,
  thread,
};

/// Bytes handed over by a reader thread. Waiting for the rest of an escape
/// sequence is a `recv_timeout` on the channel, so it works where `poll` on
/// the console does not.
#[cfg(any(not(unix), test))]
pub struct ChannelInput {
  bytes:          mpsc::Receiver<u8>,
  escape_timeout: Duration,
}

#[cfg(any(not(unix), test))]
impl ChannelInput {
  pub fn new(bytes: mpsc::Receiver<u8>, escape_timeout: Duration) -> Self {
    Self {
      bytes,
      escape_timeout,
    }
  }

  /// Moves `reader` to a thread that forwards every byte it reads.
  pub fn spawn(reader: impl io::Read + Send + 'static, escape_timeout: Duration) -> Self {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
      for byte in reader.bytes() {
        match byte {
          Ok(byte) if tx.send(byte).is_ok() => {},
          Ok(_) => break,
          Err(err) => {
            log::error!("input reader stopped: {err}");
            break;
          },
        }
      }
    });
    Self::new(rx, escape_timeout)
  }
}

#[cfg(any(not(unix), test))]
impl ByteSource for ChannelInput {
  fn read_byte(&mut self) -> io::Result<u8> {
    self
      .bytes
      .recv()
      .map_err(|_| io::Error::from(io::ErrorKind::UnexpectedEof))
  }

  fn read_pending(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    for slot in buf.iter_mut() {
      match self.bytes.recv_timeout(self.escape_timeout) {
        Ok(byte) => {
          *slot = byte;
          filled += 1;
        },
        Err(_) => break,
      }
    }
    Ok(filled)
  }
}

#[cfg(not(unix))]
pub struct TtyInput(ChannelInput);

#[cfg(not(unix))]
impl TtyInput {
  pub fn stdin(escape_timeout: Duration) -> Self {
    Self(ChannelInput::spawn(io::stdin(), escape_timeout))
  }
}

#[cfg(not(unix))]
impl ByteSource for TtyInput {
  fn read_byte(&mut self) -> io::Result<u8> {
    self.0.read_byte()
  }

  fn read_pending(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    self.0.read_pending(buf)
  }
}

#[cfg(test)]
mod tests {
  use kite_lib::input::{
    ESC,
    Key,
    read_key,
  };

  use super::*;

  #[test]
  fn lone_escape_times_out() {
    let (tx, rx) = mpsc::channel();
    let mut input = ChannelInput::new(rx, Duration::from_millis(10));

    tx.send(ESC).unwrap();
    assert_eq!(read_key(&mut input).unwrap(), Key::Escape);

    for byte in [ESC, b'[', b'A', b'x'] {
      tx.send(byte).unwrap();
    }
    assert_eq!(read_key(&mut input).unwrap(), Key::Up);
    assert_eq!(read_key(&mut input).unwrap(), Key::Byte(b'x'));

    drop(tx);
    let err = read_key(&mut input).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
  }

  #[test]
  fn reader_thread_forwards_bytes() {
    let mut input = ChannelInput::spawn(&b"\x1b[3~a"[..], Duration::from_millis(50));
    assert_eq!(read_key(&mut input).unwrap(), Key::Delete);
    assert_eq!(read_key(&mut input).unwrap(), Key::Byte(b'a'));
    assert!(read_key(&mut input).is_err());
  }
}
