use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use anyhow::bail;
use crate::message::header::MessageHeader;

/// The biggest datagram either side is prepared to receive. Anything bigger is treated as a
///  transport failure rather than being truncated.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 65536;

#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// The receiver that all data messages go to
    pub peer_addr: SocketAddr,

    /// The local address to send from. This should be of the same IP version as `peer_addr`.
    pub bind_addr: SocketAddr,

    /// Every data message carries a dummy payload of this many bytes. The default makes header and
    ///  payload fill a typical Ethernet frame without fragmentation: `1424 + 48 = 1472`, which is
    ///  `1500 - 20 - 8` for IPV4.
    pub payload_len: usize,

    pub max_datagram_size: usize,

    /// An upper bound for the number of datagrams sent in one go when the window opens. Without
    ///  a bound, a controller with a huge window would keep the event loop from processing acks.
    ///
    /// `None` means 'until the window is closed'.
    pub max_sends_per_turn: Option<usize>,
}

impl SenderConfig {
    pub const DEFAULT_PAYLOAD_LEN: usize = 1424;
    pub const DEFAULT_MAX_SENDS_PER_TURN: usize = 1024;

    pub fn new(peer_addr: SocketAddr) -> SenderConfig {
        let bind_addr = if peer_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        }
        else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        SenderConfig {
            peer_addr,
            bind_addr,
            payload_len: Self::DEFAULT_PAYLOAD_LEN,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
            max_sends_per_turn: Some(Self::DEFAULT_MAX_SENDS_PER_TURN),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.peer_addr.is_ipv4() != self.bind_addr.is_ipv4() {
            bail!("bind address {:?} and peer address {:?} are of different IP versions", self.bind_addr, self.peer_addr);
        }
        if self.max_datagram_size < MessageHeader::SERIALIZED_LEN {
            bail!("max datagram size {} can not hold a {}-byte header", self.max_datagram_size, MessageHeader::SERIALIZED_LEN);
        }
        if self.payload_len > self.max_datagram_size - MessageHeader::SERIALIZED_LEN {
            bail!("payload length {} exceeds the maximum of {} for a datagram size of {}",
                self.payload_len, self.max_datagram_size - MessageHeader::SERIALIZED_LEN, self.max_datagram_size);
        }
        if self.max_sends_per_turn == Some(0) {
            bail!("max sends per turn must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// The address that the receiving UDP socket is bound to
    pub self_addr: SocketAddr,

    pub max_datagram_size: usize,
}

impl ReceiverConfig {
    pub fn new(self_addr: SocketAddr) -> ReceiverConfig {
        ReceiverConfig {
            self_addr,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
        }
    }

    /// Listens on all IPV6 (and, depending on the OS, IPV4) interfaces
    pub fn for_port(port: u16) -> ReceiverConfig {
        Self::new(SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_datagram_size < MessageHeader::SERIALIZED_LEN {
            bail!("max datagram size {} can not hold a {}-byte header", self.max_datagram_size, MessageHeader::SERIALIZED_LEN);
        }
        Ok(())
    }
}
