//! Datagram transport for the LAN star.
//!
//! The host binds the well-known port and learns each joiner's address from
//! the first datagram it sends. Clients only ever talk to the host. All
//! sends are fire-and-forget and reads never block.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::rc::Rc;

use crate::constants::*;
use crate::protocol::NetPacket;
use crate::types::PeerId;

/// Minimal non-blocking datagram socket.
pub trait Datagram {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize>;

    /// `Ok(None)` when nothing is pending.
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>>;
}

impl Datagram for UdpSocket {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
        match UdpSocket::recv_from(self, buf) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

type Mailbox = VecDeque<(Vec<u8>, SocketAddr)>;

/// In-process datagram network. Endpoints bound to the same hub deliver to
/// each other by address; datagrams to unbound addresses vanish.
#[derive(Clone, Default)]
pub struct MemoryHub {
    mailboxes: Rc<RefCell<HashMap<SocketAddr, Mailbox>>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, addr: SocketAddr) -> MemoryEndpoint {
        self.mailboxes.borrow_mut().entry(addr).or_default();
        MemoryEndpoint {
            addr,
            hub: self.clone(),
        }
    }

    /// Datagrams waiting for `addr`.
    pub fn pending(&self, addr: SocketAddr) -> usize {
        self.mailboxes.borrow().get(&addr).map_or(0, |m| m.len())
    }
}

pub struct MemoryEndpoint {
    addr: SocketAddr,
    hub: MemoryHub,
}

impl MemoryEndpoint {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Datagram for MemoryEndpoint {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        if let Some(mailbox) = self.hub.mailboxes.borrow_mut().get_mut(&addr) {
            mailbox.push_back((buf.to_vec(), self.addr));
        }
        Ok(buf.len())
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
        let next = self
            .hub
            .mailboxes
            .borrow_mut()
            .get_mut(&self.addr)
            .and_then(|m| m.pop_front());
        Ok(next.map(|(data, from)| {
            let n = data.len().min(buf.len());
            buf[..n].copy_from_slice(&data[..n]);
            (n, from)
        }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Host,
    Client { server: SocketAddr },
}

/// Packet-level view of a datagram socket with the host's address book.
pub struct Transport<D> {
    socket: D,
    role: Role,
    peers: [Option<SocketAddr>; MAX_PLAYERS],
}

impl Transport<UdpSocket> {
    /// Bind the host socket on every interface.
    pub fn bind_host(port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))?;
        socket.set_nonblocking(true)?;
        log::info!("hosting on udp port {}", port);
        Ok(Self::new(socket, Role::Host))
    }

    /// Bind an ephemeral socket aimed at the host.
    pub fn connect_client(server_ip: &str, port: u16) -> io::Result<Self> {
        let server = (server_ip, port).to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("no address for {server_ip}"))
        })?;
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.set_nonblocking(true)?;
        log::info!("joining host at {}", server);
        Ok(Self::new(socket, Role::Client { server }))
    }
}

impl<D: Datagram> Transport<D> {
    pub fn new(socket: D, role: Role) -> Self {
        Self {
            socket,
            role,
            peers: [None; MAX_PLAYERS],
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_host(&self) -> bool {
        self.role == Role::Host
    }

    pub fn peer_addr(&self, id: PeerId) -> Option<SocketAddr> {
        usize::try_from(id).ok().and_then(|i| self.peers.get(i).copied().flatten())
    }

    pub fn connected_peers(&self) -> impl Iterator<Item = (PeerId, SocketAddr)> + '_ {
        self.peers
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.map(|a| (i as PeerId, a)))
    }

    /// Remember where peer `id` lives. The host's own slot is never stored.
    pub fn register(&mut self, id: PeerId, addr: SocketAddr) {
        if id == HOST_ID {
            return;
        }
        if let Some(slot) = usize::try_from(id).ok().and_then(|i| self.peers.get_mut(i)) {
            if slot.is_none() {
                log::info!("peer {} connected from {}", id, addr);
            }
            *slot = Some(addr);
        }
    }

    pub fn send_to_addr(&self, addr: SocketAddr, packet: &NetPacket) {
        if let Err(e) = self.socket.send_to(&packet.encode(), addr) {
            log::trace!("send {:?} to {} failed: {}", packet.kind, addr, e);
        }
    }

    pub fn send_to_peer(&self, id: PeerId, packet: &NetPacket) {
        if let Some(addr) = self.peer_addr(id) {
            self.send_to_addr(addr, packet);
        }
    }

    /// Host: every known peer except `excluding`. Clients: no-op.
    pub fn broadcast(&self, packet: &NetPacket, excluding: Option<PeerId>) {
        for (id, addr) in self.connected_peers() {
            if Some(id) != excluding {
                self.send_to_addr(addr, packet);
            }
        }
    }

    /// Role-aware send: the host fans out, a client talks to the host.
    pub fn send(&self, packet: &NetPacket) {
        match self.role {
            Role::Host => self.broadcast(packet, None),
            Role::Client { server } => self.send_to_addr(server, packet),
        }
    }

    /// Drain every pending datagram. Malformed ones are skipped; a socket
    /// error other than would-block ends the drain for this frame.
    pub fn receive_all(&mut self) -> Vec<(NetPacket, SocketAddr)> {
        let mut out = Vec::new();
        let mut buf = [0u8; 64];
        loop {
            match self.socket.recv_from(&mut buf) {
                Ok(Some((n, from))) => match NetPacket::decode(&buf[..n]) {
                    Ok(p) => out.push((p, from)),
                    Err(e) => log::debug!("dropping datagram from {}: {}", from, e),
                },
                Ok(None) => break,
                Err(e) => {
                    log::debug!("receive failed: {}", e);
                    break;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PACKET_SIZE;
    use crate::types::Vec2;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn hub_delivers_by_address() {
        let hub = MemoryHub::new();
        let a = hub.bind(addr(1));
        let b = hub.bind(addr(2));
        a.send_to(b"hi", addr(2)).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(b.recv_from(&mut buf).unwrap(), Some((2, addr(1))));
        assert_eq!(&buf[..2], b"hi");
        assert_eq!(b.recv_from(&mut buf).unwrap(), None);
    }

    #[test]
    fn unbound_destination_is_dropped() {
        let hub = MemoryHub::new();
        let a = hub.bind(addr(1));
        assert_eq!(a.send_to(b"lost", addr(9)).unwrap(), 4);
        assert_eq!(hub.pending(addr(9)), 0);
    }

    #[test]
    fn client_sends_to_server_only() {
        let hub = MemoryHub::new();
        let host = Transport::new(hub.bind(addr(25565)), Role::Host);
        let client = Transport::new(hub.bind(addr(4000)), Role::Client { server: addr(25565) });
        client.send(&NetPacket::hello(1));
        assert_eq!(hub.pending(addr(25565)), 1);
        drop(host);
    }

    #[test]
    fn host_broadcast_skips_excluded_peer() {
        let hub = MemoryHub::new();
        let mut host = Transport::new(hub.bind(addr(25565)), Role::Host);
        let _c1 = hub.bind(addr(4001));
        let _c2 = hub.bind(addr(4002));
        host.register(1, addr(4001));
        host.register(2, addr(4002));
        host.register(HOST_ID, addr(25565));
        host.broadcast(&NetPacket::pos(1, Vec2::ZERO, 1), Some(1));
        assert_eq!(hub.pending(addr(4001)), 0);
        assert_eq!(hub.pending(addr(4002)), 1);
        assert_eq!(hub.pending(addr(25565)), 0);
    }

    #[test]
    fn register_ignores_out_of_range_ids() {
        let hub = MemoryHub::new();
        let mut host = Transport::new(hub.bind(addr(25565)), Role::Host);
        host.register(7, addr(4001));
        host.register(-1, addr(4001));
        assert_eq!(host.connected_peers().count(), 0);
    }

    #[test]
    fn receive_all_skips_garbage() {
        let hub = MemoryHub::new();
        let mut host = Transport::new(hub.bind(addr(25565)), Role::Host);
        let raw = hub.bind(addr(4001));
        raw.send_to(&[1, 2, 3], addr(25565)).unwrap();
        raw.send_to(&NetPacket::hello(1).encode(), addr(25565)).unwrap();
        let got = host.receive_all();
        assert_eq!(got, vec![(NetPacket::hello(1), addr(4001))]);
    }

    #[test]
    fn udp_socket_reports_empty_queue() {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        socket.set_nonblocking(true).unwrap();
        let mut buf = [0u8; PACKET_SIZE];
        assert_eq!(Datagram::recv_from(&socket, &mut buf).unwrap(), None);
    }
}
