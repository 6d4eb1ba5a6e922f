use crate::maximum_flow::error::FlowError;
use crate::maximum_flow::graph::{EdgeId, Graph, VertexId};
use log::{debug, trace};
use num_traits::NumAssign;
use std::fmt::Debug;
use std::ops::Neg;

pub const SOURCE: &str = "s";
pub const SINK: &str = "t";

/// Decides when a discharge pushes along an edge and when it relabels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Admissibility {
    /// Push only on residual edges going exactly one level down; relabel once
    /// no outgoing edge is admissible.
    #[default]
    Canonical,
    /// Push whenever the edge goes one level down or still has residual
    /// capacity; relabel as soon as a scanned edge satisfies neither.
    /// Heights do not gate the push, so a vertex may hand its excess straight
    /// back to the source and the run can end on a valid flow that is not
    /// maximum. No termination guarantee either; pair it with a discharge limit.
    Literal,
}

/// Push-relabel with linear active vertex selection: the first vertex in
/// insertion order holding excess is discharged next.
#[derive(Default)]
pub struct PushRelabel {
    admissibility: Admissibility,
    discharge_limit: Option<usize>,

    push_count: usize,
    relabel_count: usize,
    discharge_count: usize,
}

impl PushRelabel {
    pub fn new(admissibility: Admissibility) -> Self {
        Self { admissibility, ..Self::default() }
    }

    pub fn with_admissibility(mut self, admissibility: Admissibility) -> Self {
        self.admissibility = admissibility;
        self
    }

    pub fn with_discharge_limit(mut self, limit: usize) -> Self {
        self.discharge_limit = Some(limit);
        self
    }

    #[inline]
    pub fn push_count(&self) -> usize {
        self.push_count
    }

    #[inline]
    pub fn relabel_count(&self) -> usize {
        self.relabel_count
    }

    #[inline]
    pub fn discharge_count(&self) -> usize {
        self.discharge_count
    }

    /// Maximum flow from `"s"` to `"t"`; afterwards the sink's excess holds the
    /// same value and every edge holds its share of the flow.
    pub fn solve<Flow>(&mut self, graph: &mut Graph<Flow>) -> Result<Flow, FlowError>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
    {
        self.solve_between(SOURCE, SINK, graph)
    }

    pub fn solve_between<Flow>(&mut self, source: &str, sink: &str, graph: &mut Graph<Flow>) -> Result<Flow, FlowError>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
    {
        let s = graph.find_vertex(source).ok_or_else(|| FlowError::MissingTerminal(source.to_owned()))?;
        let t = graph.find_vertex(sink).ok_or_else(|| FlowError::MissingTerminal(sink.to_owned()))?;
        if s == t {
            return Err(FlowError::IdenticalTerminals(source.to_owned()));
        }

        self.push_count = 0;
        self.relabel_count = 0;
        self.discharge_count = 0;

        self.pre_process(s, graph)?;
        debug!("preflow ready: {} vertices, {} edges, {:?} units left {}", graph.num_vertices(), graph.num_edges(), -graph.vertex(s).excess(), source);

        while let Some(u) = Self::find_active_vertex(s, t, graph) {
            if self.discharge_limit.is_some_and(|limit| self.discharge_count >= limit) {
                return Err(FlowError::DischargeLimit(self.discharge_count));
            }
            self.discharge_count += 1;

            match self.admissibility {
                Admissibility::Canonical => self.discharge(u, graph)?,
                Admissibility::Literal => self.discharge_literal(u, graph)?,
            }
        }

        let value = graph.vertex(t).excess();
        debug!("maximum flow {:?} after {} discharges, {} pushes, {} relabels", value, self.discharge_count, self.push_count, self.relabel_count);
        Ok(value)
    }

    fn pre_process<Flow>(&mut self, s: VertexId, graph: &mut Graph<Flow>) -> Result<(), FlowError>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
    {
        graph.reset();

        // edges synthesized here are reverses themselves, no need to visit them
        let num_edges = graph.num_edges();
        for edge_id in (0..num_edges).map(EdgeId) {
            if !graph.has_reverse(edge_id) {
                graph.add_reverse_edge(edge_id);
            }
        }

        graph.vertices[s.0].height = graph.num_vertices();

        let saturated: Vec<EdgeId> = graph.outgoing(s).collect();
        for edge_id in saturated {
            let capacity = graph.edge(edge_id).capacity;
            graph.push_flow(edge_id, capacity)?;
        }
        Ok(())
    }

    fn find_active_vertex<Flow>(s: VertexId, t: VertexId, graph: &Graph<Flow>) -> Option<VertexId>
    where
        Flow: NumAssign + Ord + Copy,
    {
        graph.vertex_ids().find(|&u| u != s && u != t && graph.vertex(u).excess() > Flow::zero())
    }

    fn discharge<Flow>(&mut self, u: VertexId, graph: &mut Graph<Flow>) -> Result<(), FlowError>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
    {
        let edges: Vec<EdgeId> = graph.outgoing(u).collect();
        for edge_id in edges {
            if graph.is_admissible_edge(edge_id) {
                self.push(edge_id, graph)?;
                if graph.vertex(u).excess() == Flow::zero() {
                    return Ok(());
                }
            }
        }
        self.relabel(u, graph)
    }

    fn discharge_literal<Flow>(&mut self, u: VertexId, graph: &mut Graph<Flow>) -> Result<(), FlowError>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
    {
        let edges: Vec<EdgeId> = graph.outgoing(u).collect();
        for edge_id in edges {
            let edge = graph.edge(edge_id);
            let one_level_down = graph.vertex(u).height() == graph.vertex(edge.to).height() + 1;
            if one_level_down || edge.capacity != edge.flow {
                self.push(edge_id, graph)?;
                if graph.vertex(u).excess() == Flow::zero() {
                    break;
                }
            } else {
                self.relabel(u, graph)?;
            }
        }
        Ok(())
    }

    fn push<Flow>(&mut self, edge_id: EdgeId, graph: &mut Graph<Flow>) -> Result<(), FlowError>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
    {
        let edge = graph.edge(edge_id);
        let delta = edge.residual_capacity().min(graph.vertex(edge.from).excess());
        trace!("push {:?} from {} to {}", delta, graph.vertex(edge.from).name(), graph.vertex(edge.to).name());

        graph.push_flow(edge_id, delta)?;
        self.push_count += 1;
        Ok(())
    }

    fn relabel<Flow>(&mut self, u: VertexId, graph: &mut Graph<Flow>) -> Result<(), FlowError>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
    {
        let lowest = graph
            .outgoing(u)
            .map(|edge_id| graph.edge(edge_id))
            .filter(|edge| edge.flow != edge.capacity)
            .map(|edge| graph.vertex(edge.to).height())
            .min()
            .ok_or_else(|| FlowError::RelabelExhausted(graph.vertex(u).name().to_owned()))?;

        trace!("relabel {} from {} to {}", graph.vertex(u).name(), graph.vertex(u).height(), lowest + 1);
        graph.vertices[u.0].height = lowest + 1;
        self.relabel_count += 1;
        Ok(())
    }
}
