use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// How the mock server answers each query.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// NOERROR with a single A record.
    AnswerA(Ipv4Addr),
    /// The given rcode with an empty answer section.
    Rcode(ResponseCode),
    /// UDP answers come back with TC set and no records; TCP answers fully.
    TruncateUdp(Ipv4Addr),
    /// Never replies.
    Silent,
    /// Replies with bytes that do not decode as DNS.
    Garbage,
}

/// Minimal DNS server on 127.0.0.1 listening on UDP and TCP (same port).
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_counter = Arc::clone(&udp_queries);
        let tcp_counter = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::respond(&buf[..len], behavior, false) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_counter.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(async move {
                                let mut len_bytes = [0u8; 2];
                                if stream.read_exact(&mut len_bytes).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_bytes) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                if let Some(response) = Self::respond(&query, behavior, true) {
                                    let mut frame = (response.len() as u16).to_be_bytes().to_vec();
                                    frame.extend_from_slice(&response);
                                    let _ = stream.write_all(&frame).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    fn respond(query: &[u8], behavior: MockBehavior, over_tcp: bool) -> Option<Vec<u8>> {
        let request = Message::from_vec(query).ok()?;

        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        for q in request.queries() {
            response.add_query(q.clone());
        }
        let name = request.queries().first()?.name().clone();

        match behavior {
            MockBehavior::Silent => return None,
            MockBehavior::Garbage => return Some(vec![0xde, 0xad, 0xbe]),
            MockBehavior::AnswerA(ip) => {
                response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
            }
            MockBehavior::Rcode(rcode) => {
                response.set_response_code(rcode);
            }
            MockBehavior::TruncateUdp(ip) => {
                if over_tcp {
                    response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
                } else {
                    response.set_truncated(true);
                }
            }
        }

        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        response.emit(&mut encoder).ok()?;
        Some(buf)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
