use anyhow::{anyhow, Error, Result};
use rclrs::{
    Context, CreateBasicExecutor, Node, RclrsErrorFilter, SpinOptions, QOS_PROFILE_DEFAULT,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracking_markers::common::types::Point3;
use tracking_markers::scene::{MarkerShape, SceneSnapshot, VisualElement};
use tracking_markers::{MarkerConfig, MarkerError, MarkerPublisher, SceneSink, StartupParams};

// Import the message types directly from the crates
use builtin_interfaces::msg::Time;
use geometry_msgs::msg::Point;
use std_msgs::msg::{ColorRGBA, Float64};
use visualization_msgs::msg::{Marker, MarkerArray};

/// Publishes scenes as a `MarkerArray`
struct RosSceneSink {
    node: Arc<Node>,
    publisher: Arc<rclrs::Publisher<MarkerArray>>,
}

impl RosSceneSink {
    fn stamp(&self) -> Time {
        let nsec = self.node.get_clock().now().nsec;
        Time {
            sec: nsec.div_euclid(1_000_000_000) as i32,
            nanosec: nsec.rem_euclid(1_000_000_000) as u32,
        }
    }
}

impl SceneSink for RosSceneSink {
    fn publish(&self, scene: &SceneSnapshot) -> Result<(), MarkerError> {
        let stamp = self.stamp();
        let msg = MarkerArray {
            markers: scene
                .iter()
                .map(|element| to_marker(element, &stamp))
                .collect(),
        };
        self.publisher.publish(&msg).map_err(MarkerError::publish)
    }
}

fn to_point(p: &Point3) -> Point {
    Point {
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

fn to_marker(element: &VisualElement, stamp: &Time) -> Marker {
    let mut marker = Marker::default();
    marker.header.frame_id = element.frame_id.clone();
    marker.header.stamp = stamp.clone();
    marker.ns = element.namespace.clone();
    marker.id = element.id.as_i32();
    marker.action = Marker::ADD;

    match &element.shape {
        MarkerShape::Sphere => marker.type_ = Marker::SPHERE,
        MarkerShape::LineStrip(curve) => {
            marker.type_ = Marker::LINE_STRIP;
            marker.points = curve.points().iter().map(to_point).collect();
        }
        MarkerShape::Text(text) => {
            marker.type_ = Marker::TEXT_VIEW_FACING;
            marker.text = text.clone();
        }
    }

    marker.scale.x = element.scale.x;
    marker.scale.y = element.scale.y;
    marker.scale.z = element.scale.z;

    marker.color = ColorRGBA {
        r: element.color.r,
        g: element.color.g,
        b: element.color.b,
        a: element.color.a,
    };

    marker.pose.position = to_point(&element.position);
    marker
}

struct MarkerPublisherNode {
    publisher: Arc<MarkerPublisher>,
    _position_subscription: Arc<rclrs::Subscription<Point>>,
    _countdown_subscription: Arc<rclrs::Subscription<Float64>>,
    running: Arc<AtomicBool>,
}

impl MarkerPublisherNode {
    pub fn new(executor: &rclrs::Executor, name: &str) -> Result<Arc<Self>> {
        // Create a node using the executor
        let node = executor.create_node(name)?;

        let params = read_startup_params(&node)?;
        let config = MarkerConfig::default();

        // Sample the trajectory and allow ticks
        let publisher = Arc::new(MarkerPublisher::start(config.clone(), params)?);
        let input = publisher.input();
        let naming = &config.naming;

        info!(
            "Topics: markers={}, position={}, countdown={}",
            naming.marker_topic, naming.position_topic, naming.countdown_topic
        );

        let marker_publisher =
            node.create_publisher::<MarkerArray>(&naming.marker_topic, QOS_PROFILE_DEFAULT)?;

        // Reference tcp position as geometry_msgs/Point; PosInfo publishers will not connect
        let position_input = Arc::clone(&input);
        let position_subscription = node.create_subscription::<Point, _>(
            &naming.position_topic,
            QOS_PROFILE_DEFAULT,
            move |msg: Point| {
                position_input.on_position(Point3::new(msg.x, msg.y, msg.z));
            },
        )?;

        // Seconds elapsed on the controller side
        let countdown_input = Arc::clone(&input);
        let countdown_subscription = node.create_subscription::<Float64, _>(
            &naming.countdown_topic,
            QOS_PROFILE_DEFAULT,
            move |msg: Float64| {
                countdown_input.on_elapsed(msg.data);
            },
        )?;

        let running = Arc::new(AtomicBool::new(true));
        let sink = RosSceneSink {
            node: Arc::clone(&node),
            publisher: marker_publisher,
        };

        // Start a thread to publish the markers at the configured rate
        let tick_publisher = Arc::clone(&publisher);
        let running_clone = Arc::clone(&running);
        let period = config.tick_period();
        thread::spawn(move || {
            while running_clone.load(Ordering::Relaxed) {
                if let Err(e) = tick_publisher.publish_tick(&sink) {
                    if !matches!(e, MarkerError::Publish(_)) {
                        warn!("Marker tick failed: {}", e);
                    }
                }
                thread::sleep(period);
            }
        });

        Ok(Arc::new(MarkerPublisherNode {
            publisher,
            _position_subscription: position_subscription,
            _countdown_subscription: countdown_subscription,
            running,
        }))
    }
}

impl Drop for MarkerPublisherNode {
    fn drop(&mut self) {
        // Stop the tick thread when the node is dropped
        self.running.store(false, Ordering::Relaxed);
    }
}

fn read_startup_params(node: &Arc<Node>) -> Result<StartupParams> {
    let [use_depth, part_id, alpha_id, traj_id] = StartupParams::NAMES.map(|name| {
        node.declare_parameter::<i64>(name)
            .default(0)
            .mandatory()
            .map(|param| param.get())
            .map_err(|e| anyhow!("Failed to declare parameter {}: {:?}", name, e))
    });

    Ok(StartupParams::from_raw(
        use_depth?, part_id?, alpha_id?, traj_id?,
    ))
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Marker Publisher Node...");

    // Parameters come from --ros-args, e.g.
    // --params-file /path/to/tracking_markers/config/marker_params.yaml
    let mut executor = Context::default_from_env()?.create_basic_executor();

    let marker_publisher_node = MarkerPublisherNode::new(&executor, "marker_publisher")?;

    info!(
        "Marker Publisher Node initialized ({:?}). Starting to spin...",
        marker_publisher_node.publisher.state()
    );

    // Spin the executor to process callbacks
    executor
        .spin(SpinOptions::default())
        .first_error()
        .map_err(|err| err.into())
}
