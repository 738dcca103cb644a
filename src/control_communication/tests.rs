use super::control_messages::{
    ActionArrived, Attribute, AttributeKind, Downstream, GetValue, Ping, Upstream, UpstreamContent, WithdrawAction,
    attributes_from_wire,
};
use super::*;
use crate::acquisition::{
    AttitudeError, AttitudeSource, AttitudeState, CaptureCommand, CaptureError, CaptureHandler, CaptureReceipt,
    FeasibilityEvaluator, ProgressStage, RetryController, RetryPolicy, TimingProfile,
};
use crate::geometry::{Ellipsoid, GeometryContext, GeometryError, GeometryProvider, ReferenceFrame, Vec3D};
use crate::mc::{
    ActionDispatcher, AttributeError, AttributeValue, CameraAcquisitorAdapter, MonitorAndControlAdapter,
    RegistrationTable, StatusCode,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use prost::Message;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

struct SystemClock;

impl GeometryProvider for SystemClock {
    fn reference_frame(&self) -> Result<ReferenceFrame, GeometryError> { Ok(ReferenceFrame::Itrf) }
    fn ellipsoid_model(&self) -> Result<Ellipsoid, GeometryError> { Ok(Ellipsoid::wgs84(ReferenceFrame::Itrf)) }
    fn current_utc_timestamp(&self) -> Result<DateTime<Utc>, GeometryError> { Ok(Utc::now()) }
}

struct FixedAttitude;

#[async_trait]
impl AttitudeSource for FixedAttitude {
    async fn current_attitude(&self) -> Result<AttitudeState, AttitudeError> {
        Ok(AttitudeState::new(Vec3D::new(7_000_000.0, 0.0, 0.0), Vec3D::new(-1.0, 0.0, 0.0), Utc::now()))
    }
}

/// Fails every capture until `succeed_from` (1-based).
struct FlakyCamera {
    succeed_from: u32,
    delay: Duration,
}

#[async_trait]
impl CaptureHandler for FlakyCamera {
    async fn capture(&self, command: CaptureCommand) -> Result<CaptureReceipt, CaptureError> {
        tokio::time::sleep(self.delay).await;
        if command.attempt() >= self.succeed_from {
            Ok(CaptureReceipt::new(Some(format!("img-{}", command.instance_id()))))
        } else {
            Err(CaptureError::HardwareFault)
        }
    }
}

async fn start_bridge(camera: FlakyCamera, policy: RetryPolicy) -> ControlMessenger {
    let geometry = Arc::new(GeometryContext::acquire(Arc::new(SystemClock)).unwrap());
    let profile = TimingProfile::from_millis(1000, 200, 3).unwrap();
    let controller = RetryController::new(
        FeasibilityEvaluator::new(profile, Arc::clone(&geometry), 0.0),
        geometry,
        Arc::new(FixedAttitude),
        Arc::new(camera),
        policy,
    );
    let adapter = Arc::new(CameraAcquisitorAdapter::new(ActionDispatcher::new(controller, profile.max_retries())));
    let mut table = RegistrationTable::new();
    adapter.initial_registrations(&mut table);

    let greeting = DownstreamContent::Registered(Registered::from(&table));
    let endpoint = Arc::new(ControlEndpoint::start("127.0.0.1:0", greeting).await.unwrap());
    ControlMessenger::start(endpoint, adapter)
}

async fn connect(messenger: &ControlMessenger) -> TcpStream {
    TcpStream::connect(messenger.endpoint().local_addr()).await.unwrap()
}

#[allow(clippy::cast_possible_truncation)]
async fn send(stream: &mut TcpStream, content: UpstreamContent) {
    let buf = Upstream { content: Some(content) }.encode_to_vec();
    stream.write_u32(buf.len() as u32).await.unwrap();
    stream.write_all(&buf).await.unwrap();
}

async fn recv(stream: &mut TcpStream) -> DownstreamContent {
    let frame = async {
        let len = stream.read_u32().await.unwrap();
        let mut buf = vec![0u8; len as usize];
        stream.read_exact(&mut buf).await.unwrap();
        Downstream::decode(&buf[..]).unwrap().content.unwrap()
    };
    tokio::time::timeout(Duration::from_secs(5), frame).await.expect("no downstream frame")
}

fn action(name: Option<&str>, attributes: Vec<Attribute>, instance_id: i64, report_progress: bool) -> UpstreamContent {
    UpstreamContent::ActionArrived(ActionArrived {
        name: name.map(str::to_string),
        attributes,
        instance_id,
        report_progress,
    })
}

/// Collects progress stages until the result of `instance_id` arrives.
async fn await_result(stream: &mut TcpStream, instance_id: i64) -> (Vec<u32>, u32) {
    let mut stages = Vec::new();
    loop {
        match recv(stream).await {
            DownstreamContent::ActionProgress(p) if p.instance_id == instance_id => stages.push(p.stage),
            DownstreamContent::ActionResult(r) if r.instance_id == instance_id => return (stages, r.code),
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_registration_greeting() {
    let messenger = start_bridge(FlakyCamera { succeed_from: 1, delay: Duration::ZERO }, RetryPolicy::default()).await;
    let mut stream = connect(&messenger).await;
    let DownstreamContent::Registered(registered) = recv(&mut stream).await else {
        panic!("first frame must be the registration")
    };
    assert!(!registered.update_if_exists);
    assert!(registered.parameters.is_empty());
    let names: Vec<_> = registered.actions.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["PHOTOGRAPH_LOCATION", "PHOTOGRAPH_NOW"]);
    assert!(registered.actions[0].arguments[2].optional);
    assert!(!registered.actions[0].arguments[0].optional);
}

#[tokio::test]
async fn test_photograph_now_over_tcp() {
    let messenger = start_bridge(FlakyCamera { succeed_from: 3, delay: Duration::ZERO }, RetryPolicy::default()).await;
    let mut stream = connect(&messenger).await;
    recv(&mut stream).await;

    send(&mut stream, action(Some("PHOTOGRAPH_NOW"), Vec::new(), 7, true)).await;
    let (stages, code) = await_result(&mut stream, 7).await;
    assert_eq!(code, StatusCode::Success.code());
    assert_eq!(stages.first(), Some(&ProgressStage::Accepted.code()));
    assert_eq!(stages.iter().filter(|s| **s == ProgressStage::Capturing.code()).count(), 3);
}

#[tokio::test]
async fn test_rejections_over_tcp() {
    let messenger = start_bridge(FlakyCamera { succeed_from: 1, delay: Duration::ZERO }, RetryPolicy::default()).await;
    let mut stream = connect(&messenger).await;
    recv(&mut stream).await;

    send(&mut stream, action(Some("PHOTOGRAPH_LOCATION"), vec![Attribute { kind: None }], 1, true)).await;
    let accepted = vec![ProgressStage::Accepted.code()];
    assert_eq!(await_result(&mut stream, 1).await, (accepted.clone(), StatusCode::InvalidArguments.code()));

    send(&mut stream, action(Some("FORMAT_DISK"), Vec::new(), 2, true)).await;
    assert_eq!(await_result(&mut stream, 2).await, (accepted, StatusCode::Unsupported.code()));

    send(&mut stream, action(Some("PHOTOGRAPH_LOCATION"), vec![Attribute { kind: None }], 4, false)).await;
    assert_eq!(await_result(&mut stream, 4).await, (Vec::new(), StatusCode::InvalidArguments.code()));

    send(&mut stream, action(None, Vec::new(), 3, false)).await;
    assert_eq!(await_result(&mut stream, 3).await, (Vec::new(), StatusCode::Acknowledged.code()));
}

#[tokio::test]
async fn test_burst_of_actions_loses_no_result() {
    const ACTIONS: i64 = 200;
    let messenger = start_bridge(FlakyCamera { succeed_from: 1, delay: Duration::ZERO }, RetryPolicy::default()).await;
    let mut stream = connect(&messenger).await;
    recv(&mut stream).await;

    for id in 0..ACTIONS {
        send(&mut stream, action(Some("PHOTOGRAPH_NOW"), Vec::new(), 1000 + id, true)).await;
    }
    let mut results = std::collections::HashMap::new();
    let collect = async {
        while results.len() < usize::try_from(ACTIONS).unwrap() {
            if let DownstreamContent::ActionResult(r) = recv(&mut stream).await {
                assert!(results.insert(r.instance_id, r.code).is_none(), "second result for {}", r.instance_id);
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(30), collect).await.expect("results went missing");
    assert!((1000..1000 + ACTIONS).all(|id| results.get(&id) == Some(&StatusCode::Success.code())));
}

#[tokio::test]
async fn test_duplicate_instance_over_tcp() {
    let messenger =
        start_bridge(FlakyCamera { succeed_from: 1, delay: Duration::from_millis(300) }, RetryPolicy::default()).await;
    let mut stream = connect(&messenger).await;
    recv(&mut stream).await;

    send(&mut stream, action(Some("PHOTOGRAPH_NOW"), Vec::new(), 21, false)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    send(&mut stream, action(Some("PHOTOGRAPH_NOW"), Vec::new(), 21, false)).await;
    assert_eq!(await_result(&mut stream, 21).await, (Vec::new(), StatusCode::Success.code()));

    // the rejected copy leaves nothing behind for the shared id
    send(&mut stream, UpstreamContent::Ping(Ping { echo: Some("after".to_string()) })).await;
    loop {
        match recv(&mut stream).await {
            DownstreamContent::Pong(pong) => {
                assert_eq!(pong.echo.as_deref(), Some("after"));
                break;
            }
            DownstreamContent::ActionResult(r) => panic!("unexpected result {r:?}"),
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_withdraw_over_tcp() {
    let policy = RetryPolicy::new(Duration::from_secs(30), None);
    let messenger = start_bridge(FlakyCamera { succeed_from: 99, delay: Duration::ZERO }, policy).await;
    let mut stream = connect(&messenger).await;
    recv(&mut stream).await;

    send(&mut stream, action(Some("PHOTOGRAPH_NOW"), Vec::new(), 11, true)).await;
    loop {
        if let DownstreamContent::ActionProgress(p) = recv(&mut stream).await {
            if p.stage == ProgressStage::RetryPending.code() {
                break;
            }
        }
    }
    send(&mut stream, UpstreamContent::WithdrawAction(WithdrawAction { instance_id: 11 })).await;
    let (_, code) = await_result(&mut stream, 11).await;
    assert_eq!(code, StatusCode::Cancelled.code());
}

#[tokio::test]
async fn test_ping_and_get_value() {
    let messenger = start_bridge(FlakyCamera { succeed_from: 1, delay: Duration::ZERO }, RetryPolicy::default()).await;
    let mut stream = connect(&messenger).await;
    recv(&mut stream).await;

    send(&mut stream, UpstreamContent::Ping(Ping { echo: Some("hello".to_string()) })).await;
    let DownstreamContent::Pong(pong) = recv(&mut stream).await else { panic!("expected pong") };
    assert_eq!(pong.echo.as_deref(), Some("hello"));

    send(&mut stream, UpstreamContent::GetValue(GetValue { name: "exposure".to_string() })).await;
    let DownstreamContent::ValueReply(reply) = recv(&mut stream).await else { panic!("expected value reply") };
    assert_eq!(reply.name, "exposure");
    assert!(reply.value.is_none());
}

#[test]
fn test_attribute_conversion() {
    let t = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
    let values = vec![
        AttributeValue::Double(1.5),
        AttributeValue::Long(-3),
        AttributeValue::String("x".to_string()),
        AttributeValue::Boolean(true),
        AttributeValue::Time(t),
    ];
    let wire: Vec<Attribute> = values.iter().map(Attribute::from).collect();
    assert_eq!(wire[4].kind, Some(AttributeKind::TimeMs(t.timestamp_millis())));
    assert_eq!(attributes_from_wire(wire).unwrap(), values);

    let broken = vec![Attribute { kind: Some(AttributeKind::Double(0.0)) }, Attribute { kind: None }];
    assert_eq!(attributes_from_wire(broken), Err(AttributeError::Missing { index: 1 }));
    let far = vec![Attribute { kind: Some(AttributeKind::TimeMs(i64::MAX)) }];
    assert_eq!(attributes_from_wire(far), Err(AttributeError::WrongType { index: 0 }));
}
