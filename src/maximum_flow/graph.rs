use crate::maximum_flow::error::FlowError;
use indexmap::IndexMap;
use num_traits::NumAssign;
use std::collections::HashMap;
use std::fmt::Debug;
use std::ops::Neg;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

#[derive(Debug, Clone)]
pub struct Vertex<Flow> {
    name: String,
    pub(crate) height: usize,
    pub(crate) excess: Flow,
    // keyed by the opposite endpoint, at most one edge per ordered pair
    pub(crate) outgoing: IndexMap<VertexId, EdgeId>,
    pub(crate) incoming: IndexMap<VertexId, EdgeId>,
}

impl<Flow> Vertex<Flow>
where
    Flow: Copy,
{
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn excess(&self) -> Flow {
        self.excess
    }

    pub fn edge_to(&self, to: VertexId) -> Option<EdgeId> {
        self.outgoing.get(&to).copied()
    }

    pub fn edge_from(&self, from: VertexId) -> Option<EdgeId> {
        self.incoming.get(&from).copied()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Edge<Flow> {
    pub from: VertexId,
    pub to: VertexId,
    pub flow: Flow,
    pub capacity: Flow,
    /// Synthesized by the solver as the reverse of a caller edge.
    pub residual: bool,
}

impl<Flow> Edge<Flow>
where
    Flow: NumAssign + Copy,
{
    #[inline]
    pub fn residual_capacity(&self) -> Flow {
        self.capacity - self.flow
    }
}

/// Something `add_edge` can turn into a vertex of the graph: a handle or a name.
pub trait Endpoint {
    fn resolve<Flow>(&self, graph: &Graph<Flow>) -> Option<VertexId>;

    fn describe(&self) -> String;
}

impl Endpoint for VertexId {
    fn resolve<Flow>(&self, graph: &Graph<Flow>) -> Option<VertexId> {
        (self.0 < graph.num_vertices()).then_some(*self)
    }

    fn describe(&self) -> String {
        format!("#{}", self.0)
    }
}

impl Endpoint for &str {
    fn resolve<Flow>(&self, graph: &Graph<Flow>) -> Option<VertexId> {
        graph.find_vertex(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Endpoint for String {
    fn resolve<Flow>(&self, graph: &Graph<Flow>) -> Option<VertexId> {
        graph.find_vertex(self)
    }

    fn describe(&self) -> String {
        self.clone()
    }
}

impl Endpoint for &String {
    fn resolve<Flow>(&self, graph: &Graph<Flow>) -> Option<VertexId> {
        graph.find_vertex(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Graph<Flow> {
    pub(crate) vertices: Vec<Vertex<Flow>>,
    names: HashMap<String, VertexId>,
    pub(crate) edges: Vec<Edge<Flow>>,
}

impl<Flow> Default for Graph<Flow> {
    fn default() -> Self {
        Self { vertices: Vec::new(), names: HashMap::new(), edges: Vec::new() }
    }
}

impl<Flow> Graph<Flow> {
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn find_vertex(&self, name: &str) -> Option<VertexId> {
        self.names.get(name).copied()
    }

    #[inline]
    pub fn vertex(&self, u: VertexId) -> &Vertex<Flow> {
        &self.vertices[u.0]
    }

    pub fn vertex_named(&self, name: &str) -> Result<&Vertex<Flow>, FlowError> {
        self.find_vertex(name).map(|u| self.vertex(u)).ok_or_else(|| FlowError::VertexNotFound(name.to_owned()))
    }

    #[inline]
    pub fn edge(&self, edge_id: EdgeId) -> &Edge<Flow> {
        &self.edges[edge_id.0]
    }

    pub fn all_vertices(&self) -> &[Vertex<Flow>] {
        &self.vertices
    }

    // includes synthesized reverse edges and edges orphaned by a later add_edge
    pub fn all_edges(&self) -> &[Edge<Flow>] {
        &self.edges
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn outgoing(&self, u: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices[u.0].outgoing.values().copied()
    }

    pub fn incoming(&self, u: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices[u.0].incoming.values().copied()
    }

    pub fn edge_between(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        self.vertices[from.0].outgoing.get(&to).copied()
    }

    pub fn reverse_of(&self, edge_id: EdgeId) -> Option<EdgeId> {
        let edge = &self.edges[edge_id.0];
        self.edge_between(edge.to, edge.from)
    }

    pub fn has_reverse(&self, edge_id: EdgeId) -> bool {
        self.reverse_of(edge_id).is_some()
    }
}

impl<Flow> Graph<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Debug,
{
    pub fn add_vertex(&mut self, name: impl Into<String>) -> Result<VertexId, FlowError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(FlowError::DuplicateVertex(name));
        }

        let u = VertexId(self.vertices.len());
        self.names.insert(name.clone(), u);
        self.vertices.push(Vertex { name, height: 0, excess: Flow::zero(), outgoing: IndexMap::new(), incoming: IndexMap::new() });
        Ok(u)
    }

    pub fn add_vertices<I, S>(&mut self, names: I) -> Result<Vec<VertexId>, FlowError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|name| self.add_vertex(name)).collect()
    }

    // a second edge between the same ordered pair takes over the adjacency entry,
    // the first one stays in `edges` but is no longer reachable from its endpoints
    pub fn add_edge<A, B>(&mut self, from: A, to: B, capacity: Flow) -> Result<EdgeId, FlowError>
    where
        A: Endpoint,
        B: Endpoint,
    {
        let u = from.resolve(self).ok_or_else(|| FlowError::VertexNotFound(from.describe()))?;
        let v = to.resolve(self).ok_or_else(|| FlowError::VertexNotFound(to.describe()))?;
        Ok(self.insert_edge(Edge { from: u, to: v, flow: Flow::zero(), capacity, residual: false }))
    }

    pub(crate) fn add_reverse_edge(&mut self, edge_id: EdgeId) -> EdgeId {
        let edge = &self.edges[edge_id.0];
        let (from, to) = (edge.to, edge.from);
        self.insert_edge(Edge { from, to, flow: Flow::zero(), capacity: Flow::zero(), residual: true })
    }

    fn insert_edge(&mut self, edge: Edge<Flow>) -> EdgeId {
        let edge_id = EdgeId(self.edges.len());
        self.vertices[edge.from.0].outgoing.insert(edge.to, edge_id);
        self.vertices[edge.to.0].incoming.insert(edge.from, edge_id);
        self.edges.push(edge);
        edge_id
    }

    /// Caller edges with positive capacity, the ones that carry the flow assignment.
    ///
    /// When the caller adds both `u -> v` and `v -> u`, each serves as the
    /// other's reverse and their flows are negations of each other, so one of
    /// the pair reports a negative flow. The net flow from `u` to `v` is the
    /// positive one.
    pub fn original_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge<Flow>)> + '_ {
        self.edges.iter().enumerate().filter(|(_, edge)| !edge.residual && edge.capacity > Flow::zero()).map(|(i, edge)| (EdgeId(i), edge))
    }

    pub fn excess_of(&self, name: &str) -> Result<Flow, FlowError> {
        self.vertex_named(name).map(|vertex| vertex.excess)
    }

    pub(crate) fn reset(&mut self) {
        for vertex in self.vertices.iter_mut() {
            vertex.height = 0;
            vertex.excess = Flow::zero();
        }
        for edge in self.edges.iter_mut() {
            edge.flow = Flow::zero();
        }
    }

    #[inline]
    pub fn is_admissible_edge(&self, edge_id: EdgeId) -> bool {
        let edge = &self.edges[edge_id.0];
        edge.residual_capacity() > Flow::zero() && self.vertices[edge.from.0].height == self.vertices[edge.to.0].height + 1
    }

    // moves `delta` along the edge and takes it back on the reverse edge
    pub(crate) fn push_flow(&mut self, edge_id: EdgeId, delta: Flow) -> Result<(), FlowError> {
        let (from, to) = (self.edges[edge_id.0].from, self.edges[edge_id.0].to);
        let rev = self.reverse_of(edge_id).ok_or_else(|| FlowError::MissingReverse(self.vertices[from.0].name.clone(), self.vertices[to.0].name.clone()))?;

        self.edges[edge_id.0].flow += delta;
        self.edges[rev.0].flow -= delta;
        self.vertices[from.0].excess -= delta;
        self.vertices[to.0].excess += delta;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn diamond() -> Graph<i64> {
        let mut graph = Graph::default();
        graph.add_vertices(["s", "a", "b", "t"]).unwrap();
        graph.add_edge("s", "a", 3).unwrap();
        graph.add_edge("a", "t", 2).unwrap();
        graph.add_edge("s", "b", 1).unwrap();
        graph.add_edge("b", "t", 5).unwrap();
        graph
    }

    #[test]
    fn vertices_keep_insertion_order() {
        let graph = diamond();
        let names: Vec<&str> = graph.all_vertices().iter().map(|vertex| vertex.name()).collect();
        assert_eq!(names, vec!["s", "a", "b", "t"]);
        assert_eq!(graph.find_vertex("b"), Some(VertexId(2)));
        assert_eq!(graph.find_vertex("x"), None);
    }

    #[test]
    fn duplicate_vertex_is_rejected() {
        let mut graph = diamond();
        assert_eq!(graph.add_vertex("a"), Err(FlowError::DuplicateVertex("a".to_string())));
        assert_eq!(graph.num_vertices(), 4);
    }

    #[rstest]
    #[case("x", "t", "x")]
    #[case("s", "y", "y")]
    fn add_edge_with_unknown_endpoint(#[case] from: &str, #[case] to: &str, #[case] missing: &str) {
        let mut graph = diamond();
        assert_eq!(graph.add_edge(from, to, 1), Err(FlowError::VertexNotFound(missing.to_string())));
        assert_eq!(graph.num_edges(), 4);
    }

    #[test]
    fn add_edge_by_handle_wires_adjacency() {
        let mut graph = diamond();
        let (a, b) = (VertexId(1), VertexId(2));
        let edge_id = graph.add_edge(a, b, 7).unwrap();

        assert_eq!(graph.vertex(a).edge_to(b), Some(edge_id));
        assert_eq!(graph.vertex(b).edge_from(a), Some(edge_id));
        assert_eq!(graph.edge(edge_id).capacity, 7);
        assert_eq!(graph.add_edge(VertexId(9), b, 1), Err(FlowError::VertexNotFound("#9".to_string())));
    }

    #[test]
    fn reverse_lookup() {
        let mut graph = diamond();
        let forward = graph.edge_between(VertexId(0), VertexId(1)).unwrap();
        assert!(!graph.has_reverse(forward));

        let backward = graph.add_reverse_edge(forward);
        assert_eq!(graph.reverse_of(forward), Some(backward));
        assert_eq!(graph.reverse_of(backward), Some(forward));
        assert!(graph.edge(backward).residual);
        assert_eq!(graph.original_edges().count(), 4);
    }

    #[test]
    fn repeated_edge_orphans_the_first_one() {
        let mut graph = diamond();
        let first = graph.edge_between(VertexId(0), VertexId(1)).unwrap();
        let second = graph.add_edge("s", "a", 9).unwrap();

        assert_ne!(first, second);
        assert_eq!(graph.edge_between(VertexId(0), VertexId(1)), Some(second));
        assert_eq!(graph.all_edges().len(), 5);
        assert_eq!(graph.outgoing(VertexId(0)).count(), 2);
    }

    #[test]
    fn push_flow_moves_excess() {
        let mut graph = diamond();
        let forward = graph.edge_between(VertexId(0), VertexId(1)).unwrap();
        assert_eq!(graph.push_flow(forward, 1), Err(FlowError::MissingReverse("s".to_string(), "a".to_string())));

        let backward = graph.add_reverse_edge(forward);
        graph.push_flow(forward, 2).unwrap();
        assert_eq!(graph.edge(forward).flow, 2);
        assert_eq!(graph.edge(backward).flow, -2);
        assert_eq!(graph.edge(backward).residual_capacity(), 2);
        assert_eq!(graph.excess_of("a"), Ok(2));
        assert_eq!(graph.excess_of("s"), Ok(-2));

        graph.reset();
        assert_eq!(graph.edge(forward).flow, 0);
        assert_eq!(graph.excess_of("a"), Ok(0));
    }
}
