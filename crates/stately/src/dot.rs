//! Graphviz output for automata

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display},
    hash::Hash,
};

use indexmap::{IndexMap, IndexSet};

use crate::rule::{FmtSymbol, Rule};

macro_rules! attr {
    ($id:ident, $name:literal) => {
        pub fn $id<S: Into<Cow<'a, str>>>(&mut self, $id: S) -> &mut Self {
            self.attrs.insert($name, $id.into());
            self
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GraphType {
    Undirected,
    Directed,
}

impl GraphType {
    fn edge_op(self) -> &'static str {
        match self {
            Self::Undirected => "--",
            Self::Directed => "->",
        }
    }
}

impl Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undirected => "graph",
            Self::Directed => "digraph",
        })
    }
}

#[derive(Debug)]
pub struct Graph<'a> {
    ty: GraphType,
    attrs: BTreeMap<&'static str, Cow<'a, str>>,
    nodes: IndexMap<Cow<'a, str>, Node<'a>>,
    edges: IndexMap<(Cow<'a, str>, Cow<'a, str>), Vec<Edge<'a>>>,
}

impl<'a> Graph<'a> {
    attr!(rank_dir, "rankdir");

    #[must_use]
    pub fn new(ty: GraphType) -> Self {
        Self {
            ty,
            attrs: BTreeMap::new(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    #[inline]
    pub fn node<S: Into<Cow<'a, str>>>(&mut self, id: S) -> &mut Node<'a> {
        self.nodes.entry(id.into()).or_default()
    }

    pub fn edge<L: Into<Cow<'a, str>>, R: Into<Cow<'a, str>>>(
        &mut self,
        l: L,
        r: R,
    ) -> &mut Edge<'a> {
        let l = l.into();
        let r = r.into();
        self.node(l.clone());
        self.node(r.clone());
        let edges = self.edges.entry((l, r)).or_default();
        edges.push(Edge::default());
        edges.last_mut().unwrap_or_else(|| unreachable!())
    }

    /// Lay out a rule-based automaton, numbering states in order of first
    /// appearance starting from `start`
    pub(crate) fn state_machine<S: Clone + Ord + Hash + Display>(
        start: &S,
        accept: &BTreeSet<S>,
        rules: &[Rule<S>],
    ) -> Self {
        let mut ids = IndexSet::new();
        ids.insert(start.clone());
        for rule in rules {
            ids.insert(rule.state().clone());
            ids.insert(rule.follow().clone());
        }
        ids.extend(accept.iter().cloned());

        let id = |s: &S| ids.get_index_of(s).unwrap_or_else(|| unreachable!()).to_string();

        let mut graph = Self::new(GraphType::Directed);
        graph.rank_dir("LR");

        for (i, state) in ids.iter().enumerate() {
            let node = graph.node(i.to_string());
            node.label(state.to_string());

            if accept.contains(state) {
                node.border_count("2");
            }
        }

        for rule in rules {
            graph
                .edge(id(rule.state()), id(rule.follow()))
                .label(FmtSymbol(rule.symbol()).to_string());
        }

        graph
            .node("_start")
            .style("invis")
            .shape("point")
            .label("");
        graph.edge("_start", id(start));

        graph
    }
}

#[derive(Default)]
struct AttrState {
    any: bool,
}

impl AttrState {
    fn write_all(
        f: &mut fmt::Formatter,
        attrs: &BTreeMap<&'static str, Cow<'_, str>>,
    ) -> fmt::Result {
        let mut me = Self::default();

        for (key, val) in attrs {
            f.write_str(if me.any {
                ","
            } else {
                me.any = true;
                "["
            })?;

            write!(f, "{key}={val:?}")?;
        }

        if me.any { f.write_str("]") } else { Ok(()) }
    }
}

impl Display for Graph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Self {
            ty,
            attrs,
            nodes,
            edges,
        } = self;

        write!(f, "{ty} {{")?;

        for (key, val) in attrs {
            write!(f, "{key}={val:?};")?;
        }

        for (id, Node { attrs }) in nodes {
            write!(f, "{id:?}")?;
            AttrState::write_all(f, attrs)?;
            f.write_str(";")?;
        }

        for ((l, r), edges) in edges {
            for Edge { attrs } in edges {
                write!(f, "{l:?}{}{r:?}", ty.edge_op())?;
                AttrState::write_all(f, attrs)?;
                f.write_str(";")?;
            }
        }

        f.write_str("}")
    }
}

#[derive(Debug, Default)]
pub struct Node<'a> {
    attrs: BTreeMap<&'static str, Cow<'a, str>>,
}

impl<'a> Node<'a> {
    attr!(style, "style");

    attr!(shape, "shape");

    attr!(label, "label");

    attr!(border_count, "peripheries");
}

#[derive(Debug, Default)]
pub struct Edge<'a> {
    attrs: BTreeMap<&'static str, Cow<'a, str>>,
}

impl<'a> Edge<'a> {
    attr!(label, "label");
}
