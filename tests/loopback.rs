use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use datagrump::clock::TokioClock;
use datagrump::config::{ReceiverConfig, SenderConfig};
use datagrump::controller::fixed_window::FixedWindowController;
use datagrump::end_point::receiver::ReceiverEndPoint;
use datagrump::end_point::sender::SenderEndPoint;
use datagrump::test_util::controller::RecordingController;
use datagrump::test_util::transport::MemoryTransport;
use datagrump::transport::DatagramTransport;
use tokio::time::sleep;
use tracing::Level;

#[ctor::ctor]
fn init_test_logging() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init()
        .ok();
}

fn sender_addr() -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 1], 4000))
}

fn receiver_addr() -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 2], 9090))
}

#[tokio::test]
async fn test_udp_loopback() {
    let mut receiver = ReceiverEndPoint::bind_udp(&ReceiverConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)))).await.unwrap();
    let receiver_addr = receiver.transport().local_addr().unwrap();

    let mut sender = SenderEndPoint::connect_udp(
        Arc::new(SenderConfig::new(receiver_addr)),
        FixedWindowController::new(10, 1000),
    ).await.unwrap();

    let (sender_result, receiver_result) = tokio::join!(
        sender.run(sleep(Duration::from_millis(300))),
        receiver.run(sleep(Duration::from_millis(400))),
    );
    sender_result.unwrap();
    receiver_result.unwrap();

    let stats = sender.stats();
    assert!(stats.acks_received > 0);
    assert!(stats.data_sent >= stats.acks_received);
    assert_eq!(stats.datagrams_dropped, 0);
    assert!(receiver.session().next_ack_seq() >= stats.acks_received);
    assert!(sender.session().in_flight() <= 10 + stats.timeout_probes);
}

#[tokio::test(start_paused = true)]
async fn test_steady_state_keeps_window_full() {
    let clock = Arc::new(TokioClock::new());
    let (a, b) = MemoryTransport::pair(sender_addr(), receiver_addr(), Duration::from_millis(10), clock.clone());

    let mut sender = SenderEndPoint::new(
        Arc::new(SenderConfig::new(receiver_addr())),
        RecordingController::new(4, 1000),
        a,
        clock.clone(),
    ).unwrap();
    let mut receiver = ReceiverEndPoint::new(b, clock);

    let (sender_result, receiver_result) = tokio::join!(
        sender.run(sleep(Duration::from_millis(1000))),
        receiver.run(sleep(Duration::from_millis(1000))),
    );
    sender_result.unwrap();
    receiver_result.unwrap();

    // four datagrams per round trip of 20ms
    let stats = sender.stats();
    assert!((190..=200).contains(&stats.acks_received), "{:?}", stats);
    assert_eq!(stats.timeout_probes, 0);
    assert!(sender.session().in_flight() <= 4);
    assert!(receiver.session().next_ack_seq() >= stats.acks_received);

    // no loss, no reordering: acks arrive in sequence
    let acked = sender.session().controller().acked_sequence_numbers();
    assert_eq!(acked, (0..acked.len() as u64).collect::<Vec<_>>());
    assert_eq!(sender.session().next_ack_expected(), acked.len() as u64);
}

#[tokio::test(start_paused = true)]
async fn test_probe_recovers_from_total_loss() {
    let clock = Arc::new(TokioClock::new());
    let (a, b) = MemoryTransport::pair(sender_addr(), receiver_addr(), Duration::from_millis(10), clock.clone());

    // the complete first window is lost
    let mut num_dropped = 0;
    a.set_drop_filter(move |_| {
        if num_dropped < 4 {
            num_dropped += 1;
            true
        }
        else {
            false
        }
    });

    let mut sender = SenderEndPoint::new(
        Arc::new(SenderConfig::new(receiver_addr())),
        RecordingController::new(4, 1000),
        a,
        clock.clone(),
    ).unwrap();
    let mut receiver = ReceiverEndPoint::new(b, clock);

    let (sender_result, receiver_result) = tokio::join!(
        sender.run(sleep(Duration::from_millis(1500))),
        receiver.run(sleep(Duration::from_millis(1500))),
    );
    sender_result.unwrap();
    receiver_result.unwrap();

    assert_eq!(sender.stats().timeout_probes, 1);

    // the probe is the first datagram to get through, and its ack skips over the lost ones
    let acked = sender.session().controller().acked_sequence_numbers();
    assert_eq!(acked[0], 4);
    assert!(acked.windows(2).all(|w| w[0] < w[1]));
    assert!(acked.len() > 4);
    assert!(sender.session().next_ack_expected() > 5);
    assert!(sender.session().in_flight() <= 4);
}
