//! Shared test double for the driver tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use psoc_analog::{Error, Frame, Reply, Transport, TransportError};

/// What the driver asked the transport to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exchange {
    Send(Frame),
    Receive(Frame, Option<Duration>),
}

/// Records every exchange and answers receives from a script
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub exchanges: Vec<Exchange>,
    replies: VecDeque<i32>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: &[i32]) -> Self {
        Self {
            exchanges: Vec::new(),
            replies: replies.iter().copied().collect(),
        }
    }

    pub fn reply(&mut self, value: i32) {
        self.replies.push_back(value);
    }

    pub fn count(&self) -> usize {
        self.exchanges.len()
    }

    pub fn sent(&self) -> Vec<Frame> {
        self.exchanges
            .iter()
            .map(|exchange| match exchange {
                Exchange::Send(frame) => *frame,
                Exchange::Receive(frame, _) => *frame,
            })
            .collect()
    }

    pub fn last(&self) -> Option<Exchange> {
        self.exchanges.last().copied()
    }

    pub fn replies_left(&self) -> usize {
        self.replies.len()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, frame: Frame) -> Result<(), Error> {
        self.exchanges.push(Exchange::Send(frame));
        Ok(())
    }

    fn receive(&mut self, frame: Frame, settle: Option<Duration>) -> Result<Reply, Error> {
        self.exchanges.push(Exchange::Receive(frame, settle));
        self.replies
            .pop_front()
            .map(Reply)
            .ok_or(Error::Transport(TransportError::Bus))
    }
}

pub fn cmd(address: u8, command: u8) -> Frame {
    Frame {
        address,
        command,
        argument: 0,
    }
}

pub fn arg(address: u8, command: u8, argument: u16) -> Frame {
    Frame {
        address,
        command,
        argument,
    }
}
